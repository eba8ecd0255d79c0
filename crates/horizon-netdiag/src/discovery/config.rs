//! Discovery configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::command::unix_candidates;
use crate::dotted::DEFAULT_VALUE_COLUMN;

/// Offset of the server list in a trimmed `option domain-name-servers` lease line.
pub const DEFAULT_LEASE_SERVERS_OFFSET: usize = 26;

/// Offset of the domain in a trimmed `option domain-name` lease line.
pub const DEFAULT_LEASE_SUFFIX_OFFSET: usize = 18;

/// Configuration for network configuration discovery.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Destination handed to `ip route get` to find the default route.
    pub route_probe_target: IpAddr,

    /// Destination the Windows UDP probe "connects" to. No packet is sent.
    pub udp_probe_target: SocketAddr,

    /// Candidate locations for `ip`.
    pub ip_candidates: Vec<PathBuf>,

    /// Candidate locations for `ifconfig`.
    pub ifconfig_candidates: Vec<PathBuf>,

    /// Candidate locations for `arp`.
    pub arp_candidates: Vec<PathBuf>,

    /// Candidate locations for `ipconfig`.
    pub ipconfig_candidates: Vec<PathBuf>,

    /// Directory holding `dhclient.<iface>.leases`.
    pub lease_dir: PathBuf,

    /// Column where `ipconfig /all` values start.
    pub dotted_value_column: usize,

    /// Fixed offset of the server list in `domain-name-servers` lines.
    pub lease_servers_offset: usize,

    /// Fixed offset of the domain in `domain-name` lines.
    pub lease_suffix_offset: usize,

    /// Upper bound for each external command.
    pub command_timeout: Duration,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        let google_dns = IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8));
        Self {
            route_probe_target: google_dns,
            udp_probe_target: SocketAddr::new(google_dns, 80),
            ip_candidates: unix_candidates("ip"),
            ifconfig_candidates: unix_candidates("ifconfig"),
            arp_candidates: unix_candidates("arp"),
            ipconfig_candidates: vec![PathBuf::from(r"C:\Windows\System32\ipconfig.exe")],
            lease_dir: PathBuf::from("/var/lib/dhcp"),
            dotted_value_column: DEFAULT_VALUE_COLUMN,
            lease_servers_offset: DEFAULT_LEASE_SERVERS_OFFSET,
            lease_suffix_offset: DEFAULT_LEASE_SUFFIX_OFFSET,
            command_timeout: Duration::from_secs(10),
        }
    }
}

impl DiscoveryConfig {
    /// Create a configuration with the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the route probe target.
    pub fn route_probe_target(mut self, target: IpAddr) -> Self {
        self.route_probe_target = target;
        self
    }

    /// Set the UDP probe target.
    pub fn udp_probe_target(mut self, target: SocketAddr) -> Self {
        self.udp_probe_target = target;
        self
    }

    /// Set the directory holding DHCP lease files.
    pub fn lease_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.lease_dir = dir.into();
        self
    }

    /// Set the `ipconfig` value column.
    pub fn dotted_value_column(mut self, column: usize) -> Self {
        self.dotted_value_column = column;
        self
    }

    /// Set the fixed lease file offsets (servers, suffix).
    pub fn lease_offsets(mut self, servers: usize, suffix: usize) -> Self {
        self.lease_servers_offset = servers;
        self.lease_suffix_offset = suffix;
        self
    }

    /// Set the per-command timeout.
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Path of the dhclient lease file for `interface`.
    pub fn lease_path(&self, interface: &str) -> PathBuf {
        self.lease_dir.join(format!("dhclient.{interface}.leases"))
    }
}
