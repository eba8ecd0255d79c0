//! Network configuration discovery.
//!
//! Discovery assembles one [`NetworkConfig`] snapshot from whatever the
//! platform's tools report. Each platform is an implementation of
//! [`ConfigDiscovery`]; [`PlatformDiscovery::detect`] picks one at startup.
//!
//! The parsing halves of both implementations are plain functions over
//! captured text, so real-world tool output can be checked without running
//! anything.
//!
//! # Example
//!
//! ```ignore
//! use horizon_netdiag::discovery::{ConfigDiscovery, PlatformDiscovery};
//!
//! let discovery = PlatformDiscovery::system();
//! let config = discovery.discover().await?;
//! println!("{config}");
//! ```

mod config;
pub mod linux;
pub mod windows;

use std::fmt;
use std::future::Future;
use std::net::{IpAddr, Ipv4Addr};

use serde::Serialize;

pub use config::{DEFAULT_LEASE_SERVERS_OFFSET, DEFAULT_LEASE_SUFFIX_OFFSET, DiscoveryConfig};
pub use linux::LinuxDiscovery;
pub use windows::WindowsDiscovery;

use crate::error::Result;
use crate::host::{Host, SystemHost};
use crate::network_info::{MacAddress, NetworkInterface};

/// A resolved network configuration snapshot.
///
/// `interface_name` and `hardware_address` are always set; every other
/// field is best-effort and may be absent independently.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkConfig {
    /// Source address used for outbound traffic.
    pub local_ip: Option<IpAddr>,
    /// Subnet mask of the active interface.
    pub subnet_mask: Option<Ipv4Addr>,
    /// Default gateway.
    pub default_gateway: Option<IpAddr>,
    /// Hardware address of the default gateway, from the ARP cache.
    pub default_gateway_mac: Option<MacAddress>,
    /// Name of the active interface as the OS tools print it.
    pub interface_name: String,
    /// Hardware address of the active interface.
    pub hardware_address: MacAddress,
    /// DNS servers in configured order, without duplicates.
    pub dns_servers: Vec<String>,
    /// Connection-specific DNS suffix, possibly empty.
    pub dns_suffix: String,
    /// OS description of the active interface.
    pub interface: NetworkInterface,
}

fn write_opt<T: fmt::Display>(f: &mut fmt::Formatter<'_>, label: &str, value: Option<T>) -> fmt::Result {
    match value {
        Some(v) => writeln!(f, "{label}:{v}"),
        None => writeln!(f, "{label}:<nil>"),
    }
}

impl fmt::Display for NetworkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "InterfaceName:{}", self.interface_name)?;
        writeln!(f, "HardwareAddress:{}", self.hardware_address)?;
        write_opt(f, "LocalIP", self.local_ip)?;
        writeln!(f, "DNS:{}", self.dns_servers.join(","))?;
        write_opt(f, "SubnetMask", self.subnet_mask)?;
        write_opt(f, "DefaultGateway", self.default_gateway)?;
        write_opt(f, "DefaultGatewayHardwareAddress", self.default_gateway_mac)?;
        writeln!(f, "Suffix:{}", self.dns_suffix)
    }
}

/// A way of discovering the active network configuration.
pub trait ConfigDiscovery: Send + Sync {
    /// Build a fresh snapshot.
    fn discover(&self) -> impl Future<Output = Result<NetworkConfig>> + Send;
}

/// The discovery implementation for the running platform.
pub enum PlatformDiscovery<H: Host = SystemHost> {
    /// `ip route` / `ifconfig` / dhclient leases / `arp -e`.
    Linux(LinuxDiscovery<H>),
    /// UDP probe / `ipconfig /all` / `arp -a`.
    Windows(WindowsDiscovery<H>),
}

impl<H: Host> PlatformDiscovery<H> {
    /// Pick the implementation matching the target OS.
    pub fn detect(host: H, config: DiscoveryConfig) -> Self {
        if cfg!(windows) {
            Self::Windows(WindowsDiscovery::new(host, config))
        } else {
            Self::Linux(LinuxDiscovery::new(host, config))
        }
    }
}

impl PlatformDiscovery {
    /// Platform discovery against the real system with default settings.
    pub fn system() -> Self {
        Self::detect(SystemHost, DiscoveryConfig::default())
    }
}

impl<H: Host> ConfigDiscovery for PlatformDiscovery<H> {
    async fn discover(&self) -> Result<NetworkConfig> {
        match self {
            Self::Linux(discovery) => discovery.discover().await,
            Self::Windows(discovery) => discovery.discover().await,
        }
    }
}

/// Append `item` unless an equal entry is already present.
pub(crate) fn push_unique(list: &mut Vec<String>, item: &str) {
    if !item.is_empty() && !list.iter().any(|existing| existing == item) {
        list.push(item.to_string());
    }
}
