//! Network diagnostics for Horizon.
//!
//! This crate answers three questions about the machine it runs on:
//!
//! - **Configuration**: which interface carries traffic, with which address,
//!   mask, gateway, DNS servers and hardware addresses
//! - **Reachability**: ping statistics for a host
//! - **Naming**: what DNS knows about a name or address
//!
//! Configuration comes from the platform's own tools (`ip`, `ifconfig`,
//! `arp`, dhclient leases on Linux; `ipconfig` and `arp` on Windows), whose
//! text output is parsed by the public functions in [`discovery`] and
//! [`dotted`].
//!
//! # Configuration
//!
//! ```ignore
//! use horizon_netdiag::ConfigCache;
//!
//! let cache = ConfigCache::system();
//! let config = cache.get().await?;
//! println!("{config}");
//! ```
//!
//! Every caller gets the same `Arc<NetworkConfig>` until
//! [`ConfigCache::refresh`] or [`ConfigCache::invalidate`] is called.
//!
//! # Ping
//!
//! ```ignore
//! use horizon_netdiag::ping::{PingOptions, ping};
//!
//! let result = ping("example.com", Some(PingOptions::new().count(3))).await?;
//! if !result.success {
//!     eprintln!("{}", result.error_message.unwrap_or_default());
//! }
//! ```
//!
//! # DNS
//!
//! ```ignore
//! use horizon_netdiag::dns::{lookup_hosts, resolve_all};
//!
//! let ips = lookup_hosts("https://example.com/").await?;
//! let records = resolve_all("example.com").await?;
//! ```
//!
//! # Logging
//!
//! Events are emitted through `tracing` under the targets in
//! [`logging::targets`]; see that module for filtering.

pub mod cache;
pub mod command;
pub mod discovery;
pub mod dns;
pub mod dotted;
mod error;
pub mod host;
pub mod logging;
pub mod network_info;
pub mod ping;

pub use error::{NetdiagError, Result};

// Re-export commonly used types at the crate root
pub use cache::ConfigCache;
pub use discovery::{ConfigDiscovery, DiscoveryConfig, NetworkConfig, PlatformDiscovery};
pub use dns::{DnsClient, DnsConfig, DnsRecordSet, MxRecord, SoaRecord};
pub use host::{CommandOutput, Host, SystemHost};
pub use network_info::{MacAddress, NetworkInterface};
pub use ping::{PingOptions, PingResult, Pinger};
