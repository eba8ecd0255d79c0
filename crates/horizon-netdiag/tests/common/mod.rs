//! Shared fakes for integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use horizon_netdiag::network_info::{InterfaceType, Ipv4Info};
use horizon_netdiag::{CommandOutput, Host, MacAddress, NetworkConfig, NetworkInterface};
use parking_lot::Mutex;

/// Canned reply for one program.
#[derive(Clone)]
pub enum Reply {
    Output(CommandOutput),
    Fail(io::ErrorKind),
}

/// A [`Host`] answering from canned output and recording what was asked.
#[derive(Default)]
pub struct FakeHost {
    located: HashSet<String>,
    replies: HashMap<String, Reply>,
    files: HashMap<PathBuf, String>,
    interfaces: Vec<NetworkInterface>,
    local_ip: Option<IpAddr>,
    calls: Mutex<Vec<String>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool that is found and prints `output` with `exit_code`.
    pub fn tool(mut self, name: &str, output: &str, exit_code: i32) -> Self {
        self.located.insert(name.to_string());
        self.replies.insert(
            name.to_string(),
            Reply::Output(CommandOutput::new(output, exit_code)),
        );
        self
    }

    /// Register a tool that is found but cannot be run.
    pub fn broken_tool(mut self, name: &str, kind: io::ErrorKind) -> Self {
        self.located.insert(name.to_string());
        self.replies.insert(name.to_string(), Reply::Fail(kind));
        self
    }

    pub fn file(mut self, path: impl Into<PathBuf>, contents: &str) -> Self {
        self.files.insert(path.into(), contents.to_string());
        self
    }

    pub fn interface(mut self, iface: NetworkInterface) -> Self {
        self.interfaces.push(iface);
        self
    }

    pub fn local_ip(mut self, ip: IpAddr) -> Self {
        self.local_ip = Some(ip);
        self
    }

    /// Everything the code under test asked for, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn ran(&self, program: &str) -> bool {
        self.calls()
            .iter()
            .any(|call| call.starts_with(&format!("run {program}")))
    }

    pub fn read_any_file(&self) -> bool {
        self.calls().iter().any(|call| call.starts_with("read "))
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }
}

impl Host for FakeHost {
    async fn run(
        &self,
        program: &Path,
        args: &[String],
        _timeout: Duration,
    ) -> io::Result<CommandOutput> {
        let name = program
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut call = format!("run {name}");
        for arg in args {
            call.push(' ');
            call.push_str(arg);
        }
        self.record(call);

        match self.replies.get(&name) {
            Some(Reply::Output(out)) => Ok(out.clone()),
            Some(Reply::Fail(kind)) => Err(io::Error::new(*kind, format!("{name} failed"))),
            None => Err(io::Error::new(io::ErrorKind::NotFound, format!("{name} not found"))),
        }
    }

    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.record(format!("read {}", path.display()));
        match self.files.get(path) {
            Some(contents) => Ok(contents.clone()),
            None => tokio::fs::read_to_string(path).await,
        }
    }

    fn locate(&self, name: &str, _candidates: &[PathBuf]) -> Option<PathBuf> {
        self.located
            .contains(name)
            .then(|| PathBuf::from("/fake/bin").join(name))
    }

    fn interfaces(&self) -> Vec<NetworkInterface> {
        self.interfaces.clone()
    }

    fn local_ip_toward(&self, _target: SocketAddr) -> io::Result<IpAddr> {
        self.local_ip
            .ok_or_else(|| io::Error::new(io::ErrorKind::NetworkUnreachable, "no route"))
    }
}

pub fn mac(text: &str) -> MacAddress {
    text.parse().unwrap()
}

/// An Ethernet interface with one /24 address.
pub fn ethernet(name: &str, mac_address: Option<MacAddress>, address: Ipv4Addr) -> NetworkInterface {
    NetworkInterface {
        name: name.to_string(),
        friendly_name: None,
        description: String::new(),
        mac_address,
        ipv4_addresses: vec![Ipv4Info {
            address,
            prefix_len: 24,
            netmask: Ipv4Info::prefix_to_netmask(24),
        }],
        ipv6_addresses: Vec::new(),
        interface_type: InterfaceType::Ethernet,
        is_up: true,
        index: 2,
    }
}

/// A fully populated snapshot.
pub fn sample_config() -> NetworkConfig {
    let address = Ipv4Addr::new(192, 168, 1, 23);
    let hardware_address = mac("00:11:22:33:44:55");
    NetworkConfig {
        local_ip: Some(IpAddr::V4(address)),
        subnet_mask: Some(Ipv4Addr::new(255, 255, 255, 0)),
        default_gateway: Some(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1))),
        default_gateway_mac: Some(mac("a4:91:b1:0c:22:7e")),
        interface_name: "eth0".to_string(),
        hardware_address,
        dns_servers: vec!["192.168.1.1".to_string(), "8.8.8.8".to_string()],
        dns_suffix: "home.lan".to_string(),
        interface: ethernet("eth0", Some(hardware_address), address),
    }
}
