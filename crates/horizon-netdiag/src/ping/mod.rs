//! ICMP ping through the system `ping` tool.
//!
//! The platform's own `ping` is run with a bounded count and timeout and its
//! summary lines are scraped into a [`PingResult`]. An unreachable host is a
//! result, not an error: [`PingResult::success`] is false and
//! [`PingResult::error_message`] says why. Only an empty host name is
//! rejected.
//!
//! # Example
//!
//! ```ignore
//! use horizon_netdiag::ping::{PingOptions, ping};
//!
//! let result = ping("8.8.8.8", Some(PingOptions::new().count(2))).await?;
//! println!("{result}");
//! ```

mod options;
mod parse;

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

pub use options::{DEFAULT_COUNT, DEFAULT_TIMEOUT, PingOptions, PingPlatform};
pub use parse::{PingStats, parse_ping_output, ping_args};

use crate::command::unix_candidates;
use crate::error::{NetdiagError, Result};
use crate::host::{CommandOutput, Host, SystemHost};
use crate::logging::targets;

/// Outcome of a ping run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PingResult {
    /// Host as given by the caller.
    pub host: String,
    /// Echo requests sent.
    pub sent: u32,
    /// Replies received.
    pub received: u32,
    /// Requests without a reply.
    pub lost: u32,
    /// `lost / sent * 100`, 0 when nothing was sent.
    pub packet_loss: f64,
    /// Fastest reply, zero when unknown.
    pub min_rtt: Duration,
    /// Slowest reply, zero when unknown.
    pub max_rtt: Duration,
    /// Mean reply time, zero when unknown.
    pub avg_rtt: Duration,
    /// Standard deviation, zero when unknown.
    pub stddev_rtt: Duration,
    /// At least one reply arrived.
    pub success: bool,
    /// Why the run failed outright.
    pub error_message: Option<String>,
}

impl PingResult {
    /// Combine parsed statistics into a result for `host`.
    ///
    /// When anything was sent, `lost` falls back to `sent - received` and
    /// the loss percentage is recomputed from it.
    pub fn from_stats(host: impl Into<String>, stats: PingStats) -> Self {
        let (lost, packet_loss) = if stats.sent > 0 {
            let lost = stats
                .lost
                .unwrap_or_else(|| stats.sent.saturating_sub(stats.received));
            (lost, f64::from(lost) / f64::from(stats.sent) * 100.0)
        } else {
            (stats.lost.unwrap_or(0), 0.0)
        };

        Self {
            host: host.into(),
            sent: stats.sent,
            received: stats.received,
            lost,
            packet_loss,
            min_rtt: stats.min_rtt,
            max_rtt: stats.max_rtt,
            avg_rtt: stats.avg_rtt,
            stddev_rtt: stats.stddev_rtt,
            success: stats.received > 0,
            error_message: None,
        }
    }
}

fn ms(d: Duration) -> f64 {
    d.as_micros() as f64 / 1000.0
}

impl fmt::Display for PingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ping statistics for {}:", self.host)?;
        writeln!(f, "{}", "-".repeat(40))?;
        if let Some(error) = &self.error_message {
            writeln!(f, "Error: {error}")?;
        }
        writeln!(
            f,
            "Packets: Sent = {}, Received = {}, Lost = {} ({:.1}% loss)",
            self.sent, self.received, self.lost, self.packet_loss
        )?;
        if self.received > 0 {
            writeln!(f, "Round Trip Times:")?;
            writeln!(f, "  Minimum = {:.2}ms", ms(self.min_rtt))?;
            writeln!(f, "  Maximum = {:.2}ms", ms(self.max_rtt))?;
            writeln!(f, "  Average = {:.2}ms", ms(self.avg_rtt))?;
            if !self.stddev_rtt.is_zero() {
                writeln!(f, "  StdDev  = {:.2}ms", ms(self.stddev_rtt))?;
            }
        }
        if self.success {
            writeln!(f, "Status: SUCCESS")
        } else {
            writeln!(f, "Status: FAILED")
        }
    }
}

/// Runs the system `ping` through a [`Host`].
pub struct Pinger<H = SystemHost> {
    host: H,
    platform: PingPlatform,
}

impl Pinger {
    /// Pinger for the running platform.
    pub fn system() -> Self {
        Self::new(SystemHost)
    }
}

impl<H: Host> Pinger<H> {
    /// Pinger over `host` using the running platform's ping flavor.
    pub fn new(host: H) -> Self {
        Self {
            host,
            platform: PingPlatform::current(),
        }
    }

    /// Use another platform's arguments and output format.
    pub fn with_platform(mut self, platform: PingPlatform) -> Self {
        self.platform = platform;
        self
    }

    /// The host commands run on.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The ping flavor in use.
    pub fn platform(&self) -> PingPlatform {
        self.platform
    }

    /// Ping `destination` and collect statistics.
    ///
    /// Errors only for an empty destination. Zero-valued options are
    /// replaced by defaults.
    #[tracing::instrument(skip(self, options), target = "horizon_netdiag::ping", level = "debug")]
    pub async fn ping(&self, destination: &str, options: &PingOptions) -> Result<PingResult> {
        if destination.trim().is_empty() {
            return Err(NetdiagError::InvalidInput("host cannot be empty".to_string()));
        }

        let options = options.normalized(self.platform);
        let candidates = match self.platform {
            PingPlatform::Unix => unix_candidates("ping"),
            PingPlatform::Windows => Vec::new(),
        };
        let program = self
            .host
            .locate("ping", &candidates)
            .unwrap_or_else(|| PathBuf::from("ping"));
        let args = ping_args(self.platform, destination, &options);

        let outcome = self
            .host
            .run(&program, &args, options.process_timeout())
            .await;

        let result = match outcome {
            Ok(out) => self.finish(destination, &out),
            Err(e) => {
                tracing::debug!(target: targets::PING, error = %e, "ping could not run");
                let mut result = PingResult::from_stats(destination, PingStats::default());
                result.error_message = Some(format!("failed to ping {destination}: {e}"));
                result
            }
        };

        tracing::debug!(
            target: targets::PING,
            sent = result.sent,
            received = result.received,
            loss = result.packet_loss,
            "ping finished"
        );
        Ok(result)
    }

    fn finish(&self, destination: &str, out: &CommandOutput) -> PingResult {
        let stats = parse_ping_output(self.platform, &out.output);
        let mut result = PingResult::from_stats(destination, stats);

        if result.received == 0 {
            let reason = match out.exit_code {
                Some(0) if result.sent == 0 => Some("no statistics in ping output".to_string()),
                Some(0) => None,
                Some(code) => Some(format!("exit status {code}")),
                None => Some("terminated by signal".to_string()),
            };
            result.error_message = reason.map(|reason| format!("failed to ping {destination}: {reason}"));
        }
        result
    }
}

/// Ping `destination` with the system tool. `None` options mean defaults.
pub async fn ping(destination: &str, options: Option<PingOptions>) -> Result<PingResult> {
    Pinger::system()
        .ping(destination, &options.unwrap_or_default())
        .await
}
