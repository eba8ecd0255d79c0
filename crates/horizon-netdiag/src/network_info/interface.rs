//! Network interface information.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::NetdiagError;

/// A network interface on the system.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkInterface {
    /// Interface name (e.g., "eth0", "en0", or an adapter GUID on Windows).
    pub name: String,
    /// Name shown to users ("Ethernet", "Wi-Fi"); Windows only.
    pub friendly_name: Option<String>,
    /// Human-readable description (Windows only, empty on other platforms).
    pub description: String,
    /// MAC address, if available.
    pub mac_address: Option<MacAddress>,
    /// IPv4 addresses assigned to this interface.
    pub ipv4_addresses: Vec<Ipv4Info>,
    /// IPv6 addresses assigned to this interface.
    pub ipv6_addresses: Vec<Ipv6Info>,
    /// Interface type (Ethernet, Loopback, etc.).
    pub interface_type: InterfaceType,
    /// Whether the interface is currently up.
    pub is_up: bool,
    /// Interface index.
    pub index: u32,
}

/// MAC (hardware) address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress(pub [u8; 6]);

impl MacAddress {
    /// Create a new MAC address from bytes.
    pub fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }

    /// Returns `true` for the all-zero address some tools print for
    /// incomplete entries.
    pub fn is_zero(&self) -> bool {
        self.0 == [0; 6]
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl FromStr for MacAddress {
    type Err = NetdiagError;

    /// Parse `aa:bb:cc:dd:ee:ff`, `aa-bb-cc-dd-ee-ff` (Windows `arp`) or
    /// `aabb.ccdd.eeff` (Cisco) notation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || NetdiagError::UnexpectedOutput {
            tool: "arp".to_string(),
            message: format!("not a MAC address: {s:?}"),
        };

        let hex: String = if s.contains([':', '-']) {
            let groups: Vec<&str> = s.split([':', '-']).collect();
            if groups.len() != 6 || groups.iter().any(|g| g.is_empty() || g.len() > 2) {
                return Err(invalid());
            }
            groups.iter().map(|g| format!("{g:0>2}")).collect()
        } else if s.contains('.') {
            let groups: Vec<&str> = s.split('.').collect();
            if groups.len() != 3 || groups.iter().any(|g| g.len() != 4) {
                return Err(invalid());
            }
            groups.concat()
        } else {
            return Err(invalid());
        };

        let mut bytes = [0u8; 6];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let pair = hex.get(i * 2..i * 2 + 2).ok_or_else(invalid)?;
            *byte = u8::from_str_radix(pair, 16).map_err(|_| invalid())?;
        }
        Ok(Self(bytes))
    }
}

impl Serialize for MacAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// IPv4 address information.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ipv4Info {
    /// The IPv4 address.
    pub address: Ipv4Addr,
    /// Network prefix length (CIDR notation).
    pub prefix_len: u8,
    /// Netmask derived from prefix length.
    pub netmask: Ipv4Addr,
}

impl Ipv4Info {
    /// Netmask for a CIDR prefix length.
    pub fn prefix_to_netmask(prefix_len: u8) -> Ipv4Addr {
        if prefix_len >= 32 {
            Ipv4Addr::new(255, 255, 255, 255)
        } else if prefix_len == 0 {
            Ipv4Addr::new(0, 0, 0, 0)
        } else {
            let mask = !((1u32 << (32 - prefix_len)) - 1);
            Ipv4Addr::from(mask.to_be_bytes())
        }
    }
}

/// IPv6 address information.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ipv6Info {
    /// The IPv6 address.
    pub address: Ipv6Addr,
    /// Network prefix length.
    pub prefix_len: u8,
}

/// Type of network interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum InterfaceType {
    /// Ethernet interface.
    Ethernet,
    /// Loopback interface (localhost).
    Loopback,
    /// Virtual or tunnel interface.
    Virtual,
}

impl fmt::Display for InterfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterfaceType::Ethernet => write!(f, "Ethernet"),
            InterfaceType::Loopback => write!(f, "Loopback"),
            InterfaceType::Virtual => write!(f, "Virtual"),
        }
    }
}

impl From<netdev::Interface> for NetworkInterface {
    fn from(iface: netdev::Interface) -> Self {
        let mac_address = iface.mac_addr.map(|mac| MacAddress::new(mac.octets()));

        let ipv4_addresses = iface
            .ipv4
            .iter()
            .map(|net| Ipv4Info {
                address: net.addr(),
                prefix_len: net.prefix_len(),
                netmask: Ipv4Info::prefix_to_netmask(net.prefix_len()),
            })
            .collect();

        let ipv6_addresses = iface
            .ipv6
            .iter()
            .map(|net| Ipv6Info {
                address: net.addr(),
                prefix_len: net.prefix_len(),
            })
            .collect();

        let interface_type = if iface.is_loopback() {
            InterfaceType::Loopback
        } else if iface.is_tun() {
            InterfaceType::Virtual
        } else {
            // netdev doesn't distinguish WiFi from Ethernet
            InterfaceType::Ethernet
        };

        NetworkInterface {
            is_up: iface.is_up(),
            name: iface.name,
            friendly_name: iface.friendly_name,
            description: iface.description.unwrap_or_default(),
            mac_address,
            ipv4_addresses,
            ipv6_addresses,
            interface_type,
            index: iface.index,
        }
    }
}

impl NetworkInterface {
    /// Get all network interfaces on the system.
    pub fn list() -> Vec<NetworkInterface> {
        netdev::get_interfaces()
            .into_iter()
            .map(NetworkInterface::from)
            .collect()
    }

    /// Name used by the OS's own tools: the friendly name on Windows,
    /// the kernel name elsewhere.
    pub fn display_name(&self) -> &str {
        self.friendly_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.name)
    }

    /// Get all IP addresses (both v4 and v6) for this interface.
    pub fn all_addresses(&self) -> Vec<IpAddr> {
        let mut addrs: Vec<IpAddr> = self
            .ipv4_addresses
            .iter()
            .map(|info| IpAddr::V4(info.address))
            .collect();
        addrs.extend(
            self.ipv6_addresses
                .iter()
                .map(|info| IpAddr::V6(info.address)),
        );
        addrs
    }

    /// Check whether `addr` is assigned to this interface.
    pub fn has_address(&self, addr: IpAddr) -> bool {
        match addr {
            IpAddr::V4(v4) => self.ipv4_addresses.iter().any(|info| info.address == v4),
            IpAddr::V6(v6) => self.ipv6_addresses.iter().any(|info| info.address == v6),
        }
    }

    /// Check if this interface has any IP addresses assigned.
    pub fn has_addresses(&self) -> bool {
        !self.ipv4_addresses.is_empty() || !self.ipv6_addresses.is_empty()
    }

    /// Check if this is the loopback interface.
    pub fn is_loopback(&self) -> bool {
        self.interface_type == InterfaceType::Loopback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_colon_mac() {
        let mac: MacAddress = "aa:bb:cc:dd:ee:ff".parse().unwrap();
        assert_eq!(mac.octets(), [0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);
    }

    #[test]
    fn test_parse_hyphen_mac() {
        let mac: MacAddress = "00-11-22-33-44-55".parse().unwrap();
        assert_eq!(mac.to_string(), "00:11:22:33:44:55");
    }

    #[test]
    fn test_parse_cisco_mac() {
        let mac: MacAddress = "0011.2233.4455".parse().unwrap();
        assert_eq!(mac, MacAddress::new([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]));
    }

    #[test]
    fn test_parse_short_groups() {
        // BSD arp drops leading zeros
        let mac: MacAddress = "0:1b:2c:3:4:5f".parse().unwrap();
        assert_eq!(mac.octets(), [0x00, 0x1B, 0x2C, 0x03, 0x04, 0x5F]);
    }

    #[test]
    fn test_reject_garbage() {
        assert!("(incomplete)".parse::<MacAddress>().is_err());
        assert!("aa:bb:cc".parse::<MacAddress>().is_err());
        assert!("gg:bb:cc:dd:ee:ff".parse::<MacAddress>().is_err());
        assert!("192.168.1.1".parse::<MacAddress>().is_err());
    }

    #[test]
    fn test_prefix_to_netmask() {
        assert_eq!(Ipv4Info::prefix_to_netmask(24), Ipv4Addr::new(255, 255, 255, 0));
        assert_eq!(Ipv4Info::prefix_to_netmask(0), Ipv4Addr::UNSPECIFIED);
        assert_eq!(Ipv4Info::prefix_to_netmask(32), Ipv4Addr::BROADCAST);
    }

    #[test]
    fn test_display_name_prefers_friendly_name() {
        let mut iface = NetworkInterface {
            name: "{4D36E972-E325}".to_string(),
            friendly_name: Some("Ethernet".to_string()),
            description: String::new(),
            mac_address: None,
            ipv4_addresses: Vec::new(),
            ipv6_addresses: Vec::new(),
            interface_type: InterfaceType::Ethernet,
            is_up: true,
            index: 7,
        };
        assert_eq!(iface.display_name(), "Ethernet");

        iface.friendly_name = None;
        assert_eq!(iface.display_name(), "{4D36E972-E325}");
    }
}
