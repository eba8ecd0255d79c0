//! Windows discovery: UDP probe, `ipconfig /all` and `arp -a`.

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use super::{ConfigDiscovery, DiscoveryConfig, NetworkConfig, push_unique};
use crate::dotted::extract_dotted_at;
use crate::error::{NetdiagError, Result};
use crate::host::Host;
use crate::logging::targets;
use crate::network_info::MacAddress;

/// One adapter block of `ipconfig /all`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterSection<'a> {
    /// Header text after "... adapter ", e.g. `Ethernet:`. Empty for the
    /// global block at the top.
    pub header: &'a str,
    /// Lines of the block, without the header.
    pub lines: Vec<&'a str>,
}

/// Fields taken from `ipconfig /all`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IpconfigInfo {
    /// DNS servers of the matched adapter.
    pub dns_servers: Vec<String>,
    /// Connection-specific DNS suffix of the matched adapter.
    pub dns_suffix: String,
    /// Subnet mask of the matched adapter.
    pub subnet_mask: Option<Ipv4Addr>,
    /// Last IPv4/IPv6 default gateway printed by any adapter.
    pub default_gateway: Option<IpAddr>,
}

/// Split `ipconfig /all` output into adapter sections.
///
/// A section starts at an unindented line containing ` adapter `
/// (`Ethernet adapter Ethernet:`, `Wireless LAN adapter Wi-Fi:`).
pub fn split_adapter_sections(output: &str) -> Vec<AdapterSection<'_>> {
    let mut sections = vec![AdapterSection {
        header: "",
        lines: Vec::new(),
    }];

    for line in output.lines() {
        let line = line.trim_end_matches('\r');
        let starts_section = !line.starts_with(char::is_whitespace) && line.contains(" adapter ");
        match line.find(" adapter ") {
            Some(idx) if starts_section => sections.push(AdapterSection {
                header: &line[idx + " adapter ".len()..],
                lines: Vec::new(),
            }),
            _ => {
                if let Some(current) = sections.last_mut() {
                    current.lines.push(line);
                }
            }
        }
    }

    sections
}

/// Parse `ipconfig /all` for the adapter whose header starts with
/// `interface_name`. The first matching adapter wins; the default gateway
/// is taken from any adapter, the last one printed winning and IPv4 beating
/// IPv6.
pub fn parse_ipconfig(output: &str, interface_name: &str, column: usize) -> IpconfigInfo {
    let sections = split_adapter_sections(output);
    let mut info = IpconfigInfo::default();

    let matched = sections
        .iter()
        .find(|section| !interface_name.is_empty() && section.header.starts_with(interface_name));

    if let Some(section) = matched {
        for server in extract_dotted_at(&section.lines, "DNS Servers", column) {
            push_unique(&mut info.dns_servers, &server);
        }
        info.dns_suffix = extract_dotted_at(&section.lines, "Connection-specific DNS Suffix", column)
            .into_iter()
            .next()
            .unwrap_or_default();
        info.subnet_mask = extract_dotted_at(&section.lines, "Subnet Mask", column)
            .first()
            .and_then(|mask| mask.parse().ok());
    } else {
        tracing::debug!(target: targets::DISCOVERY, interface_name, "no ipconfig section for interface");
    }

    // IPv6 gateways come first with the IPv4 one on a continuation line
    let mut last_v4 = None;
    let mut last_any = None;
    for section in &sections {
        for value in extract_dotted_at(&section.lines, "Default Gateway", column) {
            if let Ok(ip) = value.parse::<IpAddr>() {
                if ip.is_ipv4() {
                    last_v4 = Some(ip);
                }
                last_any = Some(ip);
            }
        }
    }
    info.default_gateway = last_v4.or(last_any);

    info
}

/// Extract the gateway MAC from `arp -a <gateway>` output.
///
/// The output is split on the gateway address; with at least three chunks
/// the first token of the third chunk is the MAC. Otherwise the table row
/// starting with the gateway address supplies it. An all-zero address marks
/// an incomplete entry and is ignored.
pub fn parse_arp_table(output: &str, gateway: IpAddr) -> Option<MacAddress> {
    let gateway = gateway.to_string();

    let chunks: Vec<&str> = output.split(gateway.as_str()).collect();
    if chunks.len() >= 3 {
        if let Some(mac) = chunks[2]
            .split_whitespace()
            .next()
            .and_then(|token| token.parse::<MacAddress>().ok())
            .filter(|mac| !mac.is_zero())
        {
            return Some(mac);
        }
    }

    output.lines().find_map(|line| {
        let mut fields = line.split_whitespace();
        if fields.next() != Some(gateway.as_str()) {
            return None;
        }
        fields
            .next()
            .and_then(|token| token.parse::<MacAddress>().ok())
            .filter(|mac| !mac.is_zero())
    })
}

/// Discovery for Windows.
pub struct WindowsDiscovery<H> {
    host: H,
    config: DiscoveryConfig,
}

impl<H: Host> WindowsDiscovery<H> {
    /// Create a discovery over `host`.
    pub fn new(host: H, config: DiscoveryConfig) -> Self {
        Self { host, config }
    }

    /// The host this discovery talks to.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The configuration in use.
    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    async fn ipconfig(&self, interface_name: &str) -> Result<IpconfigInfo> {
        let ipconfig = self
            .host
            .locate("ipconfig", &self.config.ipconfig_candidates)
            .unwrap_or_else(|| PathBuf::from("ipconfig"));

        let out = self
            .host
            .run(&ipconfig, &["/all".to_string()], self.config.command_timeout)
            .await?;
        if !out.success() {
            return Err(NetdiagError::CommandFailed {
                command: "ipconfig /all".to_string(),
                message: out.output.trim().to_string(),
            });
        }
        Ok(parse_ipconfig(
            &out.output,
            interface_name,
            self.config.dotted_value_column,
        ))
    }

    async fn gateway_mac(&self, gateway: IpAddr) -> Option<MacAddress> {
        let arp = self
            .host
            .locate("arp", &[])
            .unwrap_or_else(|| PathBuf::from("arp"));

        let args = vec!["-a".to_string(), gateway.to_string()];
        match self.host.run(&arp, &args, self.config.command_timeout).await {
            Ok(out) => parse_arp_table(&out.output, gateway),
            Err(e) => {
                tracing::debug!(target: targets::DISCOVERY, error = %e, "arp failed, gateway MAC unknown");
                None
            }
        }
    }
}

impl<H: Host> ConfigDiscovery for WindowsDiscovery<H> {
    #[tracing::instrument(skip(self), target = "horizon_netdiag::discovery", level = "debug")]
    async fn discover(&self) -> Result<NetworkConfig> {
        let local_ip = self.host.local_ip_toward(self.config.udp_probe_target)?;

        let interface = self
            .host
            .interfaces()
            .into_iter()
            .find(|iface| iface.has_address(local_ip))
            .ok_or_else(|| NetdiagError::InterfaceNotFound(local_ip.to_string()))?;
        let interface_name = interface.display_name().to_string();
        let hardware_address = interface
            .mac_address
            .ok_or_else(|| NetdiagError::MissingHardwareAddress(interface_name.clone()))?;

        let ipconfig = self.ipconfig(&interface_name).await?;
        let default_gateway_mac = match ipconfig.default_gateway {
            Some(gateway) => self.gateway_mac(gateway).await,
            None => None,
        };

        tracing::debug!(
            target: targets::DISCOVERY,
            interface = %interface_name,
            gateway = ?ipconfig.default_gateway,
            dns_count = ipconfig.dns_servers.len(),
            "windows discovery complete"
        );

        Ok(NetworkConfig {
            local_ip: Some(local_ip),
            subnet_mask: ipconfig.subnet_mask,
            default_gateway: ipconfig.default_gateway,
            default_gateway_mac,
            interface_name,
            hardware_address,
            dns_servers: ipconfig.dns_servers,
            dns_suffix: ipconfig.dns_suffix,
            interface,
        })
    }
}
