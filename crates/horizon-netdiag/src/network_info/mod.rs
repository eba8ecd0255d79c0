//! Network interface enumeration.
//!
//! Discovery needs the OS view of an interface (its hardware address and
//! assigned addresses) next to what the command-line tools report. This
//! module wraps `netdev` into plain data types.
//!
//! # Example
//!
//! ```ignore
//! use horizon_netdiag::network_info::NetworkInterface;
//!
//! for iface in NetworkInterface::list() {
//!     println!("{} ({})", iface.display_name(), iface.interface_type);
//!     for addr in &iface.ipv4_addresses {
//!         println!("  IPv4: {}/{}", addr.address, addr.prefix_len);
//!     }
//! }
//! ```

mod interface;

pub use interface::{InterfaceType, Ipv4Info, Ipv6Info, MacAddress, NetworkInterface};
