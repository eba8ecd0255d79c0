//! Ping invocation and statistics parsing.

use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;

use super::options::{PingOptions, PingPlatform};
use crate::logging::targets;

/// Statistics scraped from ping output.
///
/// Fields the output did not mention keep their zero/`None` value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PingStats {
    /// Echo requests sent.
    pub sent: u32,
    /// Replies received.
    pub received: u32,
    /// Lost count, when the tool reports one.
    pub lost: Option<u32>,
    /// Loss percentage, when the tool reports one.
    pub packet_loss: Option<f64>,
    /// Fastest reply.
    pub min_rtt: Duration,
    /// Mean reply time.
    pub avg_rtt: Duration,
    /// Slowest reply.
    pub max_rtt: Duration,
    /// Standard deviation (Unix only).
    pub stddev_rtt: Duration,
}

struct Patterns {
    windows_packets: Regex,
    windows_rtt: Regex,
    unix_packets: Regex,
    unix_loss: Regex,
    unix_rtt: Regex,
}

impl Patterns {
    fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            windows_packets: Regex::new(r"Sent = (\d+), Received = (\d+), Lost = (\d+)")?,
            windows_rtt: Regex::new(r"Minimum = (\d+)ms, Maximum = (\d+)ms, Average = (\d+)ms")?,
            unix_packets: Regex::new(r"(\d+) packets transmitted, (\d+) (?:packets )?received")?,
            unix_loss: Regex::new(r"(\d+(?:\.\d+)?)% packet loss")?,
            unix_rtt: Regex::new(
                r"(?:rtt|round-trip) min/avg/max/(?:mdev|stddev) = (\d+(?:\.\d+)?)/(\d+(?:\.\d+)?)/(\d+(?:\.\d+)?)/(\d+(?:\.\d+)?)",
            )?,
        })
    }
}

static PATTERNS: OnceLock<Option<Patterns>> = OnceLock::new();

fn patterns() -> Option<&'static Patterns> {
    PATTERNS
        .get_or_init(|| match Patterns::compile() {
            Ok(p) => Some(p),
            Err(e) => {
                tracing::error!(target: targets::PING, error = %e, "ping patterns failed to compile");
                None
            }
        })
        .as_ref()
}

/// Command-line arguments for pinging `host` on `platform`.
///
/// Windows takes the timeout in milliseconds; elsewhere it is whole
/// seconds, at least 1.
pub fn ping_args(platform: PingPlatform, host: &str, options: &PingOptions) -> Vec<String> {
    match platform {
        PingPlatform::Windows => vec![
            "-n".to_string(),
            options.count.to_string(),
            "-w".to_string(),
            options.timeout.as_millis().to_string(),
            "-l".to_string(),
            options.packet_size.to_string(),
            host.to_string(),
        ],
        PingPlatform::Unix => vec![
            "-c".to_string(),
            options.count.to_string(),
            "-W".to_string(),
            options.timeout.as_secs().max(1).to_string(),
            "-s".to_string(),
            options.packet_size.to_string(),
            host.to_string(),
        ],
    }
}

/// Parse ping output captured on `platform`.
pub fn parse_ping_output(platform: PingPlatform, output: &str) -> PingStats {
    let mut stats = PingStats::default();
    let Some(patterns) = patterns() else {
        return stats;
    };

    for line in output.lines().map(str::trim) {
        match platform {
            PingPlatform::Windows => parse_windows_line(patterns, line, &mut stats),
            PingPlatform::Unix => parse_unix_line(patterns, line, &mut stats),
        }
    }

    stats
}

fn parse_windows_line(patterns: &Patterns, line: &str, stats: &mut PingStats) {
    if let Some(caps) = patterns.windows_packets.captures(line) {
        stats.sent = caps[1].parse().unwrap_or(0);
        stats.received = caps[2].parse().unwrap_or(0);
        stats.lost = caps[3].parse().ok();
    }
    if let Some(caps) = patterns.windows_rtt.captures(line) {
        stats.min_rtt = millis(&caps[1]);
        stats.max_rtt = millis(&caps[2]);
        stats.avg_rtt = millis(&caps[3]);
    }
}

fn parse_unix_line(patterns: &Patterns, line: &str, stats: &mut PingStats) {
    if let Some(caps) = patterns.unix_packets.captures(line) {
        stats.sent = caps[1].parse().unwrap_or(0);
        stats.received = caps[2].parse().unwrap_or(0);
    }
    if let Some(caps) = patterns.unix_loss.captures(line) {
        stats.packet_loss = caps[1].parse().ok();
    }
    if let Some(caps) = patterns.unix_rtt.captures(line) {
        stats.min_rtt = millis(&caps[1]);
        stats.avg_rtt = millis(&caps[2]);
        stats.max_rtt = millis(&caps[3]);
        stats.stddev_rtt = millis(&caps[4]);
    }
}

fn millis(value: &str) -> Duration {
    match value.parse::<f64>() {
        Ok(ms) if ms.is_finite() && ms >= 0.0 => {
            Duration::from_nanos((ms * 1_000_000.0).round() as u64)
        }
        _ => Duration::ZERO,
    }
}
