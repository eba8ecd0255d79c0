//! Host lookups and full record sets.

use std::future::Future;
use std::net::IpAddr;
use std::time::Duration;

use super::config::DnsConfig;
use super::records::{DnsRecordSet, SoaRecord, normalize_domain};
use super::resolver::{HickoryLookup, RecordLookup};
use crate::error::{NetdiagError, Result};
use crate::logging::targets;

/// DNS diagnostics over a [`RecordLookup`].
///
/// # Example
///
/// ```ignore
/// use horizon_netdiag::dns::DnsClient;
///
/// let client = DnsClient::system()?;
/// let ips = client.lookup_hosts("https://example.com/").await?;
/// let records = client.resolve_all("example.com").await?;
/// println!("{records}");
/// ```
pub struct DnsClient<L = HickoryLookup> {
    lookup: L,
    lookup_timeout: Duration,
}

impl DnsClient {
    /// Client with the given resolver configuration.
    pub fn new(config: DnsConfig) -> Result<Self> {
        let lookup = HickoryLookup::new(&config)?;
        Ok(Self::with_lookup(lookup, config.lookup_timeout))
    }

    /// Client using the host's resolver settings.
    pub fn system() -> Result<Self> {
        Self::new(DnsConfig::system())
    }
}

impl<L: RecordLookup> DnsClient<L> {
    /// Client over any lookup implementation.
    pub fn with_lookup(lookup: L, lookup_timeout: Duration) -> Self {
        Self {
            lookup,
            lookup_timeout,
        }
    }

    /// The lookup behind this client.
    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Resolve `domain` to its addresses.
    ///
    /// A scheme prefix and trailing slash are ignored. Addresses keep the
    /// resolver's order with duplicates removed. A name that does not exist
    /// resolves to an empty list; resolver failures and the timeout are
    /// errors.
    #[tracing::instrument(skip(self), target = "horizon_netdiag::dns", level = "debug")]
    pub async fn lookup_hosts(&self, domain: &str) -> Result<Vec<IpAddr>> {
        let domain = checked_domain(domain)?;

        let addresses = tokio::time::timeout(self.lookup_timeout, self.lookup.lookup_ip(domain))
            .await
            .map_err(|_| NetdiagError::Timeout)??;

        let mut unique = Vec::with_capacity(addresses.len());
        for addr in addresses {
            if !unique.contains(&addr) {
                unique.push(addr);
            }
        }

        if unique.is_empty() {
            tracing::debug!(target: targets::DNS, domain, "no addresses");
        }
        Ok(unique)
    }

    /// Collect every record category for `domain`.
    ///
    /// Categories are queried concurrently, each under the lookup timeout.
    /// A category that fails stays `None`; only an empty domain is an
    /// error.
    #[tracing::instrument(skip(self), target = "horizon_netdiag::dns", level = "debug")]
    pub async fn resolve_all(&self, domain: &str) -> Result<DnsRecordSet> {
        let domain = checked_domain(domain)?;
        let ip_literal = domain.parse::<IpAddr>().ok();

        let ptr = async {
            match ip_literal {
                Some(ip) => self.bounded("PTR", self.lookup.lookup_ptr(ip)).await,
                None => None,
            }
        };

        let (addresses, cname, mx, ns, txt, ptr) = tokio::join!(
            self.bounded("A/AAAA", self.lookup.lookup_ip(domain)),
            self.bounded("CNAME", self.lookup.lookup_cname(domain)),
            self.bounded("MX", self.lookup.lookup_mx(domain)),
            self.bounded("NS", self.lookup.lookup_ns(domain)),
            self.bounded("TXT", self.lookup.lookup_txt(domain)),
            ptr,
        );

        let mut records = DnsRecordSet::new(domain);

        if let Some(addresses) = addresses {
            let mut a = Vec::new();
            let mut aaaa = Vec::new();
            for addr in addresses {
                let text = addr.to_string();
                let bucket = if addr.is_ipv4() { &mut a } else { &mut aaaa };
                if !bucket.contains(&text) {
                    bucket.push(text);
                }
            }
            records.a = Some(a);
            records.aaaa = Some(aaaa);
        }

        records.cname = cname.map(|names| {
            names
                .into_iter()
                .filter(|name| !name.eq_ignore_ascii_case(domain))
                .collect()
        });
        records.mx = mx;
        records.soa = ns
            .as_ref()
            .and_then(|servers| servers.first())
            .map(|primary| SoaRecord {
                primary_ns: primary.clone(),
                ..Default::default()
            });
        records.ns = ns;
        records.txt = txt;
        records.ptr = ptr;

        tracing::debug!(
            target: targets::DNS,
            domain,
            a = records.a.as_ref().map_or(0, Vec::len),
            mx = records.mx.as_ref().map_or(0, Vec::len),
            "record set resolved"
        );
        Ok(records)
    }

    async fn bounded<T>(
        &self,
        category: &'static str,
        query: impl Future<Output = Result<T>>,
    ) -> Option<T> {
        match tokio::time::timeout(self.lookup_timeout, query).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                tracing::debug!(target: targets::DNS, category, error = %e, "lookup failed");
                None
            }
            Err(_) => {
                tracing::debug!(target: targets::DNS, category, "lookup timed out");
                None
            }
        }
    }
}

fn checked_domain(input: &str) -> Result<&str> {
    let domain = normalize_domain(input);
    if domain.is_empty() {
        return Err(NetdiagError::InvalidInput(
            "domain cannot be empty".to_string(),
        ));
    }
    Ok(domain)
}

/// Resolve `domain` with the host's resolver settings.
pub async fn lookup_hosts(domain: &str) -> Result<Vec<IpAddr>> {
    let domain = checked_domain(domain)?;
    DnsClient::system()?.lookup_hosts(domain).await
}

/// Collect every record category for `domain` with the host's resolver
/// settings.
pub async fn resolve_all(domain: &str) -> Result<DnsRecordSet> {
    let domain = checked_domain(domain)?;
    DnsClient::system()?.resolve_all(domain).await
}
