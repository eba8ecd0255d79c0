//! Record lookups against a resolver.

use std::future::Future;
use std::net::IpAddr;

use hickory_resolver::config::{
    LookupIpStrategy, NameServerConfig, ResolveHosts, ResolverConfig, ResolverOpts,
};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::proto::rr::{RData, RecordType};
use hickory_resolver::proto::xfer::Protocol;
use hickory_resolver::{ResolveError, Resolver, TokioResolver};

use super::config::{DnsConfig, IpStrategy, Nameservers};
use super::records::{MxRecord, trim_root};
use crate::error::{NetdiagError, Result};
use crate::logging::targets;

/// Per-category record queries.
///
/// "No such name" and "no records of this type" are `Ok(vec![])`;
/// `Err` is reserved for failures to get an answer at all.
pub trait RecordLookup: Send + Sync {
    /// A and AAAA addresses.
    fn lookup_ip(&self, name: &str) -> impl Future<Output = Result<Vec<IpAddr>>> + Send;

    /// CNAME targets.
    fn lookup_cname(&self, name: &str) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Mail exchangers.
    fn lookup_mx(&self, name: &str) -> impl Future<Output = Result<Vec<MxRecord>>> + Send;

    /// Name servers.
    fn lookup_ns(&self, name: &str) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Text records, one string per record.
    fn lookup_txt(&self, name: &str) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Reverse names for an address.
    fn lookup_ptr(&self, ip: IpAddr) -> impl Future<Output = Result<Vec<String>>> + Send;
}

/// [`RecordLookup`] backed by hickory-resolver.
///
/// Answers are cached by the resolver for their TTL.
#[derive(Clone)]
pub struct HickoryLookup {
    resolver: TokioResolver,
}

impl HickoryLookup {
    /// Create a lookup with the given configuration.
    pub fn new(config: &DnsConfig) -> Result<Self> {
        let (resolver_config, resolver_opts) = build_resolver_config(config)?;

        let resolver =
            Resolver::builder_with_config(resolver_config, TokioConnectionProvider::default())
                .with_options(resolver_opts)
                .build();

        Ok(Self { resolver })
    }

    /// Create a lookup using the host's resolver settings.
    pub fn system() -> Result<Self> {
        Self::new(&DnsConfig::system())
    }
}

/// Translate a [`DnsConfig`] into hickory's configuration and options.
fn build_resolver_config(config: &DnsConfig) -> Result<(ResolverConfig, ResolverOpts)> {
    config.validate()?;

    let (resolver_config, mut opts) = match &config.nameservers {
        Nameservers::System => match hickory_resolver::system_conf::read_system_conf() {
            Ok(system) => system,
            Err(e) => {
                tracing::warn!(
                    target: targets::DNS,
                    error = %e,
                    "cannot read system resolver configuration, using defaults"
                );
                (ResolverConfig::default(), ResolverOpts::default())
            }
        },
        Nameservers::Custom(servers) => {
            let mut resolver_config = ResolverConfig::new();
            for addr in servers {
                resolver_config.add_name_server(NameServerConfig::new(*addr, Protocol::Udp));
                resolver_config.add_name_server(NameServerConfig::new(*addr, Protocol::Tcp));
            }
            (resolver_config, ResolverOpts::default())
        }
    };

    opts.attempts = config.attempts;
    opts.timeout = config.query_timeout;
    opts.use_hosts_file = if config.hosts_file {
        ResolveHosts::Auto
    } else {
        ResolveHosts::Never
    };
    opts.ip_strategy = match config.ip_strategy {
        IpStrategy::Ipv4Only => LookupIpStrategy::Ipv4Only,
        IpStrategy::Ipv6Only => LookupIpStrategy::Ipv6Only,
        IpStrategy::Ipv4AndIpv6 => LookupIpStrategy::Ipv4AndIpv6,
    };

    Ok((resolver_config, opts))
}

/// Map a resolver error, treating "nothing there" as an empty answer.
fn empty_or_err<T>(name: &str, error: ResolveError) -> Result<Vec<T>> {
    if error.is_nx_domain() || error.is_no_records_found() {
        tracing::trace!(target: targets::DNS, name, "no records");
        Ok(Vec::new())
    } else {
        Err(NetdiagError::Dns(format!("{name}: {error}")))
    }
}

impl RecordLookup for HickoryLookup {
    async fn lookup_ip(&self, name: &str) -> Result<Vec<IpAddr>> {
        match self.resolver.lookup_ip(name).await {
            Ok(response) => Ok(response.iter().collect()),
            Err(e) => empty_or_err(name, e),
        }
    }

    async fn lookup_cname(&self, name: &str) -> Result<Vec<String>> {
        match self.resolver.lookup(name, RecordType::CNAME).await {
            Ok(response) => Ok(response
                .iter()
                .filter_map(|rdata| match rdata {
                    RData::CNAME(cname) => Some(trim_root(&cname.0.to_utf8())),
                    _ => None,
                })
                .collect()),
            Err(e) => empty_or_err(name, e),
        }
    }

    async fn lookup_mx(&self, name: &str) -> Result<Vec<MxRecord>> {
        match self.resolver.mx_lookup(name).await {
            Ok(response) => Ok(response
                .iter()
                .map(|mx| MxRecord {
                    host: trim_root(&mx.exchange().to_utf8()),
                    priority: mx.preference(),
                })
                .collect()),
            Err(e) => empty_or_err(name, e),
        }
    }

    async fn lookup_ns(&self, name: &str) -> Result<Vec<String>> {
        match self.resolver.ns_lookup(name).await {
            Ok(response) => Ok(response.iter().map(|ns| trim_root(&ns.0.to_utf8())).collect()),
            Err(e) => empty_or_err(name, e),
        }
    }

    async fn lookup_txt(&self, name: &str) -> Result<Vec<String>> {
        match self.resolver.txt_lookup(name).await {
            Ok(response) => Ok(response
                .iter()
                .map(|txt| {
                    txt.txt_data()
                        .iter()
                        .map(|chunk| String::from_utf8_lossy(chunk))
                        .collect::<String>()
                })
                .collect()),
            Err(e) => empty_or_err(name, e),
        }
    }

    async fn lookup_ptr(&self, ip: IpAddr) -> Result<Vec<String>> {
        match self.resolver.reverse_lookup(ip).await {
            Ok(response) => Ok(response.iter().map(|ptr| trim_root(&ptr.0.to_utf8())).collect()),
            Err(e) => empty_or_err(&ip.to_string(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_custom_config_requires_nameservers() {
        let config = DnsConfig::servers(Vec::<IpAddr>::new());
        assert!(matches!(
            build_resolver_config(&config),
            Err(NetdiagError::Dns(_))
        ));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let config = DnsConfig::system().attempts(0);
        assert!(build_resolver_config(&config).unwrap_err().is_input_error());
    }

    #[test]
    fn test_options_applied() {
        let servers: Vec<IpAddr> = vec!["192.0.2.53".parse().unwrap(), "192.0.2.54".parse().unwrap()];
        let config = DnsConfig::servers(servers)
            .attempts(4)
            .query_timeout(Duration::from_secs(2))
            .hosts_file(false)
            .ip_strategy(IpStrategy::Ipv6Only);
        let (resolver_config, opts) = build_resolver_config(&config).unwrap();

        // UDP and TCP per server
        assert_eq!(resolver_config.name_servers().len(), 4);
        assert_eq!(opts.attempts, 4);
        assert_eq!(opts.timeout, Duration::from_secs(2));
        assert!(matches!(opts.use_hosts_file, ResolveHosts::Never));
        assert!(matches!(opts.ip_strategy, LookupIpStrategy::Ipv6Only));
    }
}
