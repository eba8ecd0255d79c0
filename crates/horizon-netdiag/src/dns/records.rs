//! DNS record types.

use std::fmt;

use serde::Serialize;

/// A mail exchange record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MxRecord {
    /// Mail server host, without the trailing dot.
    pub host: String,
    /// Preference; lower is tried first.
    pub priority: u16,
}

/// A start-of-authority record.
///
/// Only `primary_ns` is filled in; it is taken from the first NS record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SoaRecord {
    /// Primary name server.
    pub primary_ns: String,
    /// Responsible mailbox.
    pub mailbox: String,
    /// Zone serial.
    pub serial: u32,
    /// Refresh interval, seconds.
    pub refresh: u32,
    /// Retry interval, seconds.
    pub retry: u32,
    /// Expiry, seconds.
    pub expire: u32,
    /// Minimum TTL, seconds.
    pub min_ttl: u32,
}

/// All records found for one name.
///
/// `None` means the category could not be resolved; `Some(vec![])` means
/// it resolved to nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DnsRecordSet {
    /// The normalized name that was queried.
    pub domain: String,
    /// IPv4 addresses.
    pub a: Option<Vec<String>>,
    /// IPv6 addresses.
    pub aaaa: Option<Vec<String>>,
    /// Canonical names other than `domain` itself.
    pub cname: Option<Vec<String>>,
    /// Mail exchangers in resolver order.
    pub mx: Option<Vec<MxRecord>>,
    /// Name servers.
    pub ns: Option<Vec<String>>,
    /// Text records, SPF included.
    pub txt: Option<Vec<String>>,
    /// Approximated SOA.
    pub soa: Option<SoaRecord>,
    /// Reverse names, only when `domain` is an IP address.
    pub ptr: Option<Vec<String>>,
}

impl DnsRecordSet {
    /// An empty set for `domain`.
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            ..Default::default()
        }
    }
}

fn write_section<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    values: Option<&[T]>,
) -> fmt::Result {
    match values {
        Some(values) if !values.is_empty() => {
            writeln!(f, "{title}:")?;
            for value in values {
                writeln!(f, "  - {value}")?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

impl fmt::Display for MxRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Priority {}: {}", self.priority, self.host)
    }
}

impl fmt::Display for DnsRecordSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DNS Records for {}:", self.domain)?;
        writeln!(f, "{}", "-".repeat(50))?;

        write_section(f, "A Records (IPv4)", self.a.as_deref())?;
        write_section(f, "AAAA Records (IPv6)", self.aaaa.as_deref())?;
        write_section(f, "CNAME Records", self.cname.as_deref())?;
        write_section(f, "MX Records (Mail)", self.mx.as_deref())?;
        write_section(f, "NS Records (Name Servers)", self.ns.as_deref())?;
        write_section(f, "TXT Records (includes SPF)", self.txt.as_deref())?;

        if let Some(soa) = &self.soa {
            writeln!(f, "SOA Record:")?;
            writeln!(f, "  - Primary NS: {}", soa.primary_ns)?;
            if !soa.mailbox.is_empty() {
                writeln!(f, "  - Contact: {}", soa.mailbox)?;
            }
        }

        write_section(f, "PTR Records (Reverse DNS)", self.ptr.as_deref())
    }
}

/// Strip a leading `http://`/`https://` and one trailing `/`.
pub fn normalize_domain(input: &str) -> &str {
    let domain = input.trim();
    let domain = domain
        .strip_prefix("http://")
        .or_else(|| domain.strip_prefix("https://"))
        .unwrap_or(domain);
    domain.strip_suffix('/').unwrap_or(domain)
}

/// Drop the root label's trailing dot from a presentation-form name.
pub(crate) fn trim_root(name: &str) -> String {
    name.strip_suffix('.').unwrap_or(name).to_string()
}
