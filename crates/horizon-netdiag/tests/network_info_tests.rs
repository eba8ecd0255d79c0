//! Network information tests.

use std::net::{IpAddr, Ipv4Addr};

use horizon_netdiag::network_info::{InterfaceType, MacAddress, NetworkInterface};
use horizon_netdiag::{Host, SystemHost};

#[test]
fn test_list_interfaces() {
    let interfaces = NetworkInterface::list();
    // Containers may hide everything but loopback; just check consistency
    for iface in &interfaces {
        assert!(!iface.name.is_empty());
        assert!(!iface.display_name().is_empty());
    }
}

#[test]
fn test_loopback_has_addresses() {
    let interfaces = NetworkInterface::list();
    let loopback = interfaces.iter().find(|iface| iface.is_loopback());

    if let Some(lo) = loopback {
        assert!(lo.has_addresses(), "Loopback should have addresses");
        assert_eq!(lo.interface_type, InterfaceType::Loopback);
        assert!(
            lo.all_addresses().iter().any(IpAddr::is_loopback),
            "Loopback should carry a loopback address"
        );
    }
}

#[test]
fn test_interface_all_addresses() {
    for iface in NetworkInterface::list() {
        let all_addrs = iface.all_addresses();
        assert_eq!(
            all_addrs.len(),
            iface.ipv4_addresses.len() + iface.ipv6_addresses.len()
        );
        for addr in all_addrs {
            assert!(iface.has_address(addr));
        }
    }
}

#[test]
fn test_system_host_interface_lookup() {
    let host = SystemHost::new();
    if let Some(first) = host.interfaces().into_iter().next() {
        let found = host.interface_by_name(&first.name).unwrap();
        assert_eq!(found.index, first.index);
    }
    assert!(host.interface_by_name("no-such-interface0").is_none());
}

#[test]
fn test_system_host_local_ip_for_loopback() {
    // Routing toward loopback needs no network access
    let host = SystemHost::new();
    let local = host
        .local_ip_toward((Ipv4Addr::LOCALHOST, 80).into())
        .unwrap();
    assert!(local.is_loopback());
}

#[test]
fn test_mac_address_display() {
    let mac = MacAddress::new([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);
    assert_eq!(mac.to_string(), "AA:BB:CC:DD:EE:FF");

    let mac2 = MacAddress::new([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
    assert_eq!(mac2.to_string(), "00:11:22:33:44:55");
}

#[test]
fn test_mac_address_forms_agree() {
    let colon: MacAddress = "a4:91:b1:0c:22:7e".parse().unwrap();
    let hyphen: MacAddress = "A4-91-B1-0C-22-7E".parse().unwrap();
    let cisco: MacAddress = "a491.b10c.227e".parse().unwrap();
    assert_eq!(colon, hyphen);
    assert_eq!(colon, cisco);
    assert!(!colon.is_zero());
    assert!("00:00:00:00:00:00".parse::<MacAddress>().unwrap().is_zero());
}

#[test]
fn test_mac_address_serializes_as_string() {
    let mac = MacAddress::new([0x00, 0x1B, 0x2C, 0x03, 0x04, 0x5F]);
    let json = serde_json::to_string(&mac).unwrap();
    assert_eq!(json, "\"00:1B:2C:03:04:5F\"");
}
