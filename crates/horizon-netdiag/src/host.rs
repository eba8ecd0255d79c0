//! Access to the operating system.
//!
//! Every side effect the diagnostics need (running a tool, reading a lease
//! file, enumerating interfaces, asking the routing table for a source
//! address) goes through [`Host`]. [`SystemHost`] is the real thing; tests
//! substitute canned output.

use std::future::Future;
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use crate::command;
use crate::logging::targets;
use crate::network_info::NetworkInterface;

/// Captured result of an external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Standard output followed by standard error.
    pub output: String,
    /// Exit code, `None` if the process was killed by a signal.
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    /// Create output for a process that exited with `exit_code`.
    pub fn new(output: impl Into<String>, exit_code: i32) -> Self {
        Self {
            output: output.into(),
            exit_code: Some(exit_code),
        }
    }

    /// Whether the process exited with status 0.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Operating-system facilities used by discovery and ping.
pub trait Host: Send + Sync {
    /// Run `program` with `args`, capturing combined output.
    ///
    /// A non-zero exit is not an error; the caller inspects
    /// [`CommandOutput::exit_code`]. Exceeding `timeout` yields an
    /// [`io::ErrorKind::TimedOut`] error and the child is killed.
    fn run(
        &self,
        program: &Path,
        args: &[String],
        timeout: Duration,
    ) -> impl Future<Output = io::Result<CommandOutput>> + Send;

    /// Read a text file.
    fn read_to_string(&self, path: &Path) -> impl Future<Output = io::Result<String>> + Send;

    /// Locate an executable, see [`command::resolve`].
    fn locate(&self, name: &str, candidates: &[PathBuf]) -> Option<PathBuf> {
        command::resolve(name, candidates)
    }

    /// Enumerate network interfaces.
    fn interfaces(&self) -> Vec<NetworkInterface>;

    /// Find an interface by kernel name or friendly name.
    fn interface_by_name(&self, name: &str) -> Option<NetworkInterface> {
        self.interfaces()
            .into_iter()
            .find(|iface| iface.name == name || iface.friendly_name.as_deref() == Some(name))
    }

    /// Source address the routing table picks for traffic to `target`.
    fn local_ip_toward(&self, target: SocketAddr) -> io::Result<IpAddr>;
}

/// [`Host`] backed by the real operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHost;

impl SystemHost {
    /// Create a new system host.
    pub fn new() -> Self {
        Self
    }
}

impl Host for SystemHost {
    async fn run(
        &self,
        program: &Path,
        args: &[String],
        timeout: Duration,
    ) -> io::Result<CommandOutput> {
        tracing::debug!(
            target: targets::NETDIAG,
            program = %program.display(),
            ?args,
            "running command"
        );

        let child = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(timeout, child).await.map_err(|_| {
            io::Error::new(
                io::ErrorKind::TimedOut,
                format!("{} did not finish within {:?}", program.display(), timeout),
            )
        })??;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(CommandOutput {
            output: text,
            exit_code: output.status.code(),
        })
    }

    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        tokio::fs::read_to_string(path).await
    }

    fn interfaces(&self) -> Vec<NetworkInterface> {
        NetworkInterface::list()
    }

    fn local_ip_toward(&self, target: SocketAddr) -> io::Result<IpAddr> {
        let bind: SocketAddr = match target {
            SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };
        // Connecting a UDP socket only consults the routing table.
        let socket = UdpSocket::bind(bind)?;
        socket.connect(target)?;
        Ok(socket.local_addr()?.ip())
    }
}
