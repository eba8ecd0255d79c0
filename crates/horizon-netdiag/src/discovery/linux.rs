//! Linux discovery: `ip route`, `ifconfig`, dhclient leases and `arp`.

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use super::{ConfigDiscovery, DiscoveryConfig, NetworkConfig, push_unique};
use crate::error::{NetdiagError, Result};
use crate::host::Host;
use crate::logging::targets;
use crate::network_info::MacAddress;

/// Characters that must never appear in an interface name.
const FORBIDDEN_NAME_CHARS: [char; 9] = [';', '&', '|', '`', '$', '(', ')', '\n', '/'];

/// Route to the probe target as reported by `ip route get`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
    /// Next hop, absent for directly connected destinations.
    pub gateway: Option<IpAddr>,
    /// Outgoing interface.
    pub interface: String,
    /// Source address.
    pub local_ip: Option<IpAddr>,
}

/// DNS settings found in a dhclient lease file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaseInfo {
    /// Name servers in lease order, without duplicates.
    pub dns_servers: Vec<String>,
    /// Last `domain-name` seen.
    pub domain_suffix: Option<String>,
}

/// Parse `ip route get <target>` output.
///
/// At least seven whitespace-separated fields are required. Field 2 is the
/// gateway, field 4 the interface and field 6 the source address; when the
/// `dev`/`src` keywords are present they locate the values instead, which
/// also covers routes without a `via` hop.
pub fn parse_route_get(output: &str) -> Result<RouteInfo> {
    let fields: Vec<&str> = output.split_whitespace().collect();
    if fields.len() < 7 {
        return Err(NetdiagError::UnexpectedOutput {
            tool: "ip route".to_string(),
            message: format!("expected at least 7 fields, got {}", fields.len()),
        });
    }

    let after = |keyword: &str| {
        fields
            .iter()
            .position(|field| *field == keyword)
            .and_then(|i| fields.get(i + 1))
            .copied()
    };

    let (gateway, interface, local_ip) = if fields.contains(&"dev") {
        (after("via"), after("dev"), after("src"))
    } else {
        (Some(fields[2]), Some(fields[4]), Some(fields[6]))
    };

    let interface = interface.unwrap_or_default().to_string();
    if interface.is_empty() {
        return Err(NetdiagError::UnexpectedOutput {
            tool: "ip route".to_string(),
            message: "no outgoing interface".to_string(),
        });
    }

    Ok(RouteInfo {
        gateway: gateway.and_then(|g| g.parse().ok()),
        interface,
        local_ip: local_ip.and_then(|ip| ip.parse().ok()),
    })
}

/// Extract the subnet mask from `ifconfig <iface>` output.
///
/// The classic layout carries the mask as the fifth field of the second
/// line. Newer net-tools (`netmask 255.255.255.0`), old net-tools
/// (`Mask:255.255.255.0`) and BSD (`netmask 0xffffff00`) are recognised too.
pub fn parse_ifconfig_netmask(output: &str) -> Option<Ipv4Addr> {
    let positional = output
        .lines()
        .nth(1)
        .and_then(|line| line.split_whitespace().nth(4))
        .and_then(parse_mask);
    if positional.is_some() {
        return positional;
    }

    let tokens: Vec<&str> = output.split_whitespace().collect();
    tokens.iter().enumerate().find_map(|(i, token)| {
        if let Some(mask) = token.strip_prefix("Mask:") {
            parse_mask(mask)
        } else if *token == "netmask" {
            tokens.get(i + 1).and_then(|mask| parse_mask(mask))
        } else {
            None
        }
    })
}

/// Parse a dotted or hex mask, accepting only contiguous ones so that a
/// broadcast address in the same position is not taken for a mask.
fn parse_mask(text: &str) -> Option<Ipv4Addr> {
    let mask = match text.strip_prefix("0x") {
        Some(hex) => Ipv4Addr::from(u32::from_str_radix(hex, 16).ok()?),
        None => text.parse().ok()?,
    };
    let bits = u32::from(mask);
    (bits.leading_ones() + bits.trailing_zeros() == 32).then_some(mask)
}

/// Reject interface names that could smuggle shell syntax.
pub fn validate_interface_name(name: &str) -> Result<()> {
    if name.contains(FORBIDDEN_NAME_CHARS) {
        return Err(NetdiagError::InvalidInterfaceName(name.to_string()));
    }
    Ok(())
}

/// Parse the `domain-name` lines of a dhclient lease file.
///
/// Values are read at fixed offsets into the trimmed line
/// (`servers_offset` for `option domain-name-servers`, `suffix_offset` for
/// `option domain-name`). A line whose prefix does not match the expected
/// label is parsed relative to the label instead and logged.
pub fn parse_dhcp_leases(text: &str, servers_offset: usize, suffix_offset: usize) -> LeaseInfo {
    let mut info = LeaseInfo::default();

    for line in text.lines().filter(|line| line.contains("domain-name")) {
        let trimmed = line.trim();
        if trimmed.contains("domain-name-servers") {
            if let Some(value) = lease_value(trimmed, servers_offset, "domain-name-servers") {
                for server in value.split(',') {
                    push_unique(&mut info.dns_servers, server.trim());
                }
            }
        } else if let Some(value) = lease_value(trimmed, suffix_offset, "domain-name") {
            if !value.is_empty() {
                info.domain_suffix = Some(value);
            }
        }
    }

    info
}

fn lease_value(line: &str, offset: usize, label: &str) -> Option<String> {
    let raw = match (line.get(..offset), line.get(offset..)) {
        (Some(prefix), Some(value)) if prefix.ends_with(label) => value,
        _ => {
            let start = line.find(label)? + label.len();
            tracing::warn!(
                target: targets::DISCOVERY,
                label,
                offset,
                "lease line does not match the expected layout, using label-relative parse"
            );
            &line[start..]
        }
    };

    let value = raw.trim().trim_end_matches(';').trim().trim_matches('"');
    Some(value.to_string())
}

/// Extract the gateway MAC from `arp -e <gateway>` output.
///
/// The second line's third field holds the address; failing that, the row
/// whose first field is the gateway is used. All-zero addresses of
/// incomplete entries are skipped.
pub fn parse_arp_entry(output: &str, gateway: IpAddr) -> Option<MacAddress> {
    let from_second_line = output
        .lines()
        .nth(1)
        .and_then(|line| line.split_whitespace().nth(2))
        .and_then(|field| field.parse::<MacAddress>().ok())
        .filter(|mac| !mac.is_zero());
    if from_second_line.is_some() {
        return from_second_line;
    }

    let gateway = gateway.to_string();
    output.lines().find_map(|line| {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.first() != Some(&gateway.as_str()) {
            return None;
        }
        fields
            .iter()
            .skip(1)
            .find_map(|field| field.parse::<MacAddress>().ok())
            .filter(|mac| !mac.is_zero())
    })
}

/// Discovery for Linux and other Unix-likes with iproute2.
pub struct LinuxDiscovery<H> {
    host: H,
    config: DiscoveryConfig,
}

impl<H: Host> LinuxDiscovery<H> {
    /// Create a discovery over `host`.
    pub fn new(host: H, config: DiscoveryConfig) -> Self {
        Self { host, config }
    }

    /// The host this discovery talks to.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The active configuration.
    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    async fn default_route(&self) -> Result<RouteInfo> {
        let ip = self
            .host
            .locate("ip", &self.config.ip_candidates)
            .ok_or_else(|| NetdiagError::ToolUnavailable("ip".to_string()))?;

        let args = vec![
            "route".to_string(),
            "get".to_string(),
            self.config.route_probe_target.to_string(),
        ];
        let out = self.host.run(&ip, &args, self.config.command_timeout).await?;
        if !out.success() {
            return Err(NetdiagError::CommandFailed {
                command: "ip route get".to_string(),
                message: out.output.trim().to_string(),
            });
        }
        parse_route_get(&out.output)
    }

    async fn subnet_mask(&self, interface: &str) -> Option<Ipv4Addr> {
        let ifconfig = self
            .host
            .locate("ifconfig", &self.config.ifconfig_candidates)
            .unwrap_or_else(|| PathBuf::from("ifconfig"));

        match self
            .host
            .run(&ifconfig, &[interface.to_string()], self.config.command_timeout)
            .await
        {
            Ok(out) if out.success() => parse_ifconfig_netmask(&out.output),
            Ok(out) => {
                tracing::debug!(target: targets::DISCOVERY, exit_code = ?out.exit_code, "ifconfig failed, subnet mask unknown");
                None
            }
            Err(e) => {
                tracing::debug!(target: targets::DISCOVERY, error = %e, "ifconfig unavailable, subnet mask unknown");
                None
            }
        }
    }

    async fn lease_info(&self, interface: &str) -> LeaseInfo {
        let path = self.config.lease_path(interface);
        match self.host.read_to_string(&path).await {
            Ok(text) => parse_dhcp_leases(
                &text,
                self.config.lease_servers_offset,
                self.config.lease_suffix_offset,
            ),
            Err(e) => {
                tracing::debug!(target: targets::DISCOVERY, path = %path.display(), error = %e, "no dhclient lease file");
                LeaseInfo::default()
            }
        }
    }

    async fn gateway_mac(&self, gateway: IpAddr) -> Option<MacAddress> {
        let Some(arp) = self.host.locate("arp", &self.config.arp_candidates) else {
            tracing::debug!(target: targets::DISCOVERY, "arp not found, gateway MAC unknown");
            return None;
        };

        let args = vec!["-e".to_string(), gateway.to_string()];
        match self.host.run(&arp, &args, self.config.command_timeout).await {
            Ok(out) => parse_arp_entry(&out.output, gateway),
            Err(e) => {
                tracing::debug!(target: targets::DISCOVERY, error = %e, "arp failed, gateway MAC unknown");
                None
            }
        }
    }
}

impl<H: Host> ConfigDiscovery for LinuxDiscovery<H> {
    #[tracing::instrument(skip(self), target = "horizon_netdiag::discovery", level = "debug")]
    async fn discover(&self) -> Result<NetworkConfig> {
        let route = self.default_route().await?;
        validate_interface_name(&route.interface)?;

        let interface = self
            .host
            .interface_by_name(&route.interface)
            .ok_or_else(|| NetdiagError::InterfaceNotFound(route.interface.clone()))?;
        let hardware_address = interface
            .mac_address
            .ok_or_else(|| NetdiagError::MissingHardwareAddress(route.interface.clone()))?;

        let subnet_mask = self.subnet_mask(&route.interface).await;
        let lease = self.lease_info(&route.interface).await;
        let default_gateway_mac = match route.gateway {
            Some(gateway) => self.gateway_mac(gateway).await,
            None => None,
        };

        tracing::debug!(
            target: targets::DISCOVERY,
            interface = %route.interface,
            gateway = ?route.gateway,
            dns_count = lease.dns_servers.len(),
            "linux discovery complete"
        );

        Ok(NetworkConfig {
            local_ip: route.local_ip,
            subnet_mask,
            default_gateway: route.gateway,
            default_gateway_mac,
            interface_name: route.interface,
            hardware_address,
            dns_servers: lease.dns_servers,
            dns_suffix: lease.domain_suffix.unwrap_or_default(),
            interface,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_with_gateway() {
        let out = "8.8.8.8 via 192.168.1.1 dev eth0 src 192.168.1.23 uid 1000 \n    cache \n";
        let route = parse_route_get(out).unwrap();
        assert_eq!(route.gateway, Some("192.168.1.1".parse().unwrap()));
        assert_eq!(route.interface, "eth0");
        assert_eq!(route.local_ip, Some("192.168.1.23".parse().unwrap()));
    }

    #[test]
    fn test_direct_route_has_no_gateway() {
        let out = "8.8.8.8 dev wg0 src 10.2.0.2 uid 0 \n    cache \n";
        let route = parse_route_get(out).unwrap();
        assert_eq!(route.gateway, None);
        assert_eq!(route.interface, "wg0");
        assert_eq!(route.local_ip, Some("10.2.0.2".parse().unwrap()));
    }

    #[test]
    fn test_positional_fallback() {
        let out = "8.8.8.8 through 10.0.0.1 on eth1 from 10.0.0.9";
        let route = parse_route_get(out).unwrap();
        assert_eq!(route.gateway, Some("10.0.0.1".parse().unwrap()));
        assert_eq!(route.interface, "eth1");
    }

    #[test]
    fn test_short_route_output_is_error() {
        let err = parse_route_get("RTNETLINK answers: Network is unreachable").unwrap_err();
        assert!(matches!(err, NetdiagError::UnexpectedOutput { .. }));
    }

    #[test]
    fn test_netmask_modern_net_tools() {
        let out = "eth0: flags=4163<UP,BROADCAST,RUNNING,MULTICAST>  mtu 1500\n        inet 192.168.1.23  netmask 255.255.255.0  broadcast 192.168.1.255\n";
        assert_eq!(parse_ifconfig_netmask(out), Some(Ipv4Addr::new(255, 255, 255, 0)));
    }

    #[test]
    fn test_netmask_old_net_tools() {
        let out = "eth0      Link encap:Ethernet  HWaddr 00:11:22:33:44:55\n          inet addr:10.0.0.5  Bcast:10.0.0.255  Mask:255.255.0.0\n";
        assert_eq!(parse_ifconfig_netmask(out), Some(Ipv4Addr::new(255, 255, 0, 0)));
    }

    #[test]
    fn test_netmask_bsd_hex() {
        let out = "en0: flags=8863<UP> mtu 1500\n\tether 00:11:22:33:44:55\n\tinet 192.168.1.9 netmask 0xffffff00 broadcast 192.168.1.255\n";
        assert_eq!(parse_ifconfig_netmask(out), Some(Ipv4Addr::new(255, 255, 255, 0)));
    }

    #[test]
    fn test_netmask_positional_field() {
        let out = "eth0 up\n inet 10.1.1.1 mask is 255.255.255.128\n";
        assert_eq!(parse_ifconfig_netmask(out), Some(Ipv4Addr::new(255, 255, 255, 128)));
    }

    #[test]
    fn test_netmask_skips_broadcast_in_fifth_field() {
        let out = "em0: flags=8843<UP>\n\tinet 192.168.1.23 up broadcast 192.168.1.255 netmask 0xffffff00\n";
        assert_eq!(parse_ifconfig_netmask(out), Some(Ipv4Addr::new(255, 255, 255, 0)));
    }

    #[test]
    fn test_netmask_rejects_non_contiguous() {
        assert_eq!(parse_mask("255.0.255.0"), None);
        assert_eq!(parse_mask("0xffff00ff"), None);
        assert_eq!(parse_mask("255.255.252.0"), Some(Ipv4Addr::new(255, 255, 252, 0)));
    }

    #[test]
    fn test_rejects_shell_metacharacters() {
        for name in ["eth0;reboot", "eth0&", "a|b", "`id`", "$(id)", "eth0\nx", "../etc"] {
            let err = validate_interface_name(name).unwrap_err();
            assert!(err.is_security_error(), "{name:?} should be rejected");
        }
        assert!(validate_interface_name("enp0s31f6").is_ok());
        assert!(validate_interface_name("eth0.100").is_ok());
    }

    #[test]
    fn test_lease_parsing() {
        let text = r#"lease {
  interface "eth0";
  fixed-address 192.168.1.23;
  option subnet-mask 255.255.255.0;
  option routers 192.168.1.1;
  option domain-name-servers 192.168.1.1,8.8.8.8;
  option domain-name "home.lan";
}
lease {
  option domain-name-servers 8.8.8.8,1.1.1.1;
  option domain-name "office.lan";
}
"#;
        let info = parse_dhcp_leases(text, 26, 18);
        assert_eq!(info.dns_servers, vec!["192.168.1.1", "8.8.8.8", "1.1.1.1"]);
        assert_eq!(info.domain_suffix.as_deref(), Some("office.lan"));
    }

    #[test]
    fn test_lease_layout_divergence_falls_back_to_label() {
        let text = "  supersede domain-name-servers 9.9.9.9;\n";
        let info = parse_dhcp_leases(text, 26, 18);
        assert_eq!(info.dns_servers, vec!["9.9.9.9"]);
    }

    #[test]
    fn test_arp_entry() {
        let out = "Address                  HWtype  HWaddress           Flags Mask            Iface\n192.168.1.1              ether   a4:91:b1:0c:22:7e   C                     eth0\n";
        let mac = parse_arp_entry(out, "192.168.1.1".parse().unwrap()).unwrap();
        assert_eq!(mac.to_string(), "A4:91:B1:0C:22:7E");
    }

    #[test]
    fn test_arp_incomplete_entry_ignored() {
        let out = "Address                  HWtype  HWaddress           Flags Mask            Iface\n192.168.1.1              ether   00:00:00:00:00:00   C                     eth0\n";
        assert_eq!(parse_arp_entry(out, "192.168.1.1".parse().unwrap()), None);
    }

    #[test]
    fn test_arp_no_entry() {
        let out = "192.168.1.1 (192.168.1.1) -- no entry\n";
        assert_eq!(parse_arp_entry(out, "192.168.1.1".parse().unwrap()), None);
    }
}
