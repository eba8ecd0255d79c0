//! Resolver settings for the DNS diagnostics.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::error::{NetdiagError, Result};

/// Where queries are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Nameservers {
    /// The host's resolver configuration (`/etc/resolv.conf`, or the
    /// registry on Windows).
    #[default]
    System,
    /// Only these servers, over UDP with TCP fallback.
    Custom(Vec<SocketAddr>),
}

/// How a [`DnsClient`](super::DnsClient) talks to the resolver.
///
/// Diagnostics usually either trust the host's settings or ask one specific
/// server, the way `nslookup name server` does:
///
/// ```ignore
/// let config = DnsConfig::servers(["192.168.1.1".parse()?])
///     .lookup_timeout(Duration::from_secs(3));
/// ```
#[derive(Debug, Clone)]
pub struct DnsConfig {
    /// Servers to query.
    pub nameservers: Nameservers,
    /// Address families asked for by address lookups.
    pub ip_strategy: IpStrategy,
    /// Tries per query before the resolver gives up.
    pub attempts: usize,
    /// Wait for one try.
    pub query_timeout: Duration,
    /// Bound on one record category, every try included.
    pub lookup_timeout: Duration,
    /// Answer names from the hosts file first.
    pub hosts_file: bool,
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            nameservers: Nameservers::System,
            ip_strategy: IpStrategy::default(),
            attempts: 2,
            query_timeout: Duration::from_secs(5),
            lookup_timeout: Duration::from_secs(10),
            hosts_file: true,
        }
    }
}

impl DnsConfig {
    /// The host's resolver settings.
    pub fn system() -> Self {
        Self::default()
    }

    /// Ask only `servers`, each on port 53.
    pub fn servers(servers: impl IntoIterator<Item = IpAddr>) -> Self {
        Self {
            nameservers: Nameservers::Custom(
                servers
                    .into_iter()
                    .map(|ip| SocketAddr::new(ip, 53))
                    .collect(),
            ),
            ..Self::default()
        }
    }

    /// Add a server. The first one replaces the system settings.
    pub fn nameserver(mut self, addr: SocketAddr) -> Self {
        let mut list = match std::mem::take(&mut self.nameservers) {
            Nameservers::System => Vec::new(),
            Nameservers::Custom(list) => list,
        };
        list.push(addr);
        self.nameservers = Nameservers::Custom(list);
        self
    }

    pub fn ip_strategy(mut self, strategy: IpStrategy) -> Self {
        self.ip_strategy = strategy;
        self
    }

    pub fn attempts(mut self, attempts: usize) -> Self {
        self.attempts = attempts;
        self
    }

    pub fn query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    pub fn lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    pub fn hosts_file(mut self, enabled: bool) -> Self {
        self.hosts_file = enabled;
        self
    }

    /// Reject settings that could never produce an answer.
    pub fn validate(&self) -> Result<()> {
        if matches!(&self.nameservers, Nameservers::Custom(list) if list.is_empty()) {
            return Err(NetdiagError::Dns("No nameservers configured".to_string()));
        }
        if self.attempts == 0 {
            return Err(NetdiagError::InvalidInput(
                "attempts must be at least 1".to_string(),
            ));
        }
        if self.query_timeout.is_zero() || self.lookup_timeout.is_zero() {
            return Err(NetdiagError::InvalidInput(
                "DNS timeouts must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Address families for A/AAAA lookups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IpStrategy {
    /// A records only.
    Ipv4Only,
    /// AAAA records only.
    Ipv6Only,
    /// Both, queried in parallel, so a record set carries A and AAAA.
    #[default]
    Ipv4AndIpv6,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_servers_use_port_53() {
        let config = DnsConfig::servers([IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1))]);
        assert_eq!(
            config.nameservers,
            Nameservers::Custom(vec!["192.168.1.1:53".parse().unwrap()])
        );
    }

    #[test]
    fn test_nameserver_replaces_system() {
        let config = DnsConfig::system()
            .nameserver("10.0.0.53:5353".parse().unwrap())
            .nameserver("10.0.0.54:53".parse().unwrap());
        match config.nameservers {
            Nameservers::Custom(list) => assert_eq!(list.len(), 2),
            Nameservers::System => panic!("expected custom servers"),
        }
    }

    #[test]
    fn test_validate() {
        assert!(DnsConfig::default().validate().is_ok());
        assert!(matches!(
            DnsConfig::servers(Vec::<IpAddr>::new()).validate(),
            Err(NetdiagError::Dns(_))
        ));
        assert!(DnsConfig::default().attempts(0).validate().unwrap_err().is_input_error());
        assert!(
            DnsConfig::default()
                .lookup_timeout(Duration::ZERO)
                .validate()
                .unwrap_err()
                .is_input_error()
        );
    }
}
