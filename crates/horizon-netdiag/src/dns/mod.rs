//! DNS diagnostics.
//!
//! Address lookups and full record sets (A, AAAA, CNAME, MX, NS, TXT, PTR
//! and an approximated SOA) through hickory-resolver.
//!
//! # Features
//!
//! - **Input normalization**: `https://example.com/` and `example.com` are
//!   the same query
//! - **Independent categories**: each record type is bounded by its own
//!   timeout and a failure leaves only that category empty
//! - **Built-in caching**: the resolver caches answers for their TTL
//! - **Pluggable lookups**: [`RecordLookup`] can be replaced, e.g. for
//!   offline tests
//!
//! # Example
//!
//! ```ignore
//! use horizon_netdiag::dns::{DnsClient, DnsConfig};
//! use std::time::Duration;
//!
//! // Ask the gateway directly instead of the system resolvers
//! let client = DnsClient::new(
//!     DnsConfig::servers(["192.168.1.1".parse()?]).lookup_timeout(Duration::from_secs(3)),
//! )?;
//! let records = client.resolve_all("example.com").await?;
//! if let Some(mx) = &records.mx {
//!     for record in mx {
//!         println!("{record}");
//!     }
//! }
//! ```

mod client;
mod config;
mod records;
mod resolver;

pub use client::{DnsClient, lookup_hosts, resolve_all};
pub use config::{DnsConfig, IpStrategy, Nameservers};
pub use records::{DnsRecordSet, MxRecord, SoaRecord, normalize_domain};
pub use resolver::{HickoryLookup, RecordLookup};
