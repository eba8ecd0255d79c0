//! Ping options.

use std::time::Duration;

/// Default number of echo requests.
pub const DEFAULT_COUNT: u32 = 4;

/// Default per-reply timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(4);

/// The ping flavor whose arguments and output format apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PingPlatform {
    /// `ping -n/-w/-l`, `Sent = X, Received = Y` statistics.
    Windows,
    /// iputils and BSD `ping -c/-W/-s`.
    Unix,
}

impl PingPlatform {
    /// The platform this binary was built for.
    pub fn current() -> Self {
        if cfg!(windows) { Self::Windows } else { Self::Unix }
    }

    /// Payload size the platform's own ping uses.
    pub fn default_packet_size(self) -> u32 {
        match self {
            Self::Windows => 32,
            Self::Unix => 56,
        }
    }
}

/// Options for a ping run.
///
/// Zero values are not errors; [`normalized`](Self::normalized) replaces
/// them with the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingOptions {
    /// Number of echo requests to send.
    pub count: u32,
    /// How long to wait for each reply.
    pub timeout: Duration,
    /// Payload size in bytes.
    pub packet_size: u32,
}

impl Default for PingOptions {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            timeout: DEFAULT_TIMEOUT,
            packet_size: PingPlatform::current().default_packet_size(),
        }
    }
}

impl PingOptions {
    /// Options with the platform defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of echo requests.
    pub fn count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Set the per-reply timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the payload size.
    pub fn packet_size(mut self, size: u32) -> Self {
        self.packet_size = size;
        self
    }

    /// Copy with zero fields replaced by defaults for `platform`.
    pub fn normalized(self, platform: PingPlatform) -> Self {
        Self {
            count: if self.count == 0 { DEFAULT_COUNT } else { self.count },
            timeout: if self.timeout.is_zero() {
                DEFAULT_TIMEOUT
            } else {
                self.timeout
            },
            packet_size: if self.packet_size == 0 {
                platform.default_packet_size()
            } else {
                self.packet_size
            },
        }
    }

    /// Upper bound for the whole ping process.
    pub(crate) fn process_timeout(&self) -> Duration {
        self.timeout
            .saturating_mul(self.count)
            .saturating_add(Duration::from_secs(5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = PingOptions::default();
        assert_eq!(opts.count, 4);
        assert_eq!(opts.timeout, Duration::from_secs(4));
        let expected = if cfg!(windows) { 32 } else { 56 };
        assert_eq!(opts.packet_size, expected);
    }

    #[test]
    fn test_zero_values_normalized() {
        let opts = PingOptions::new()
            .count(0)
            .timeout(Duration::ZERO)
            .packet_size(0)
            .normalized(PingPlatform::Windows);
        assert_eq!(opts.count, 4);
        assert_eq!(opts.timeout, Duration::from_secs(4));
        assert_eq!(opts.packet_size, 32);
    }

    #[test]
    fn test_explicit_values_kept() {
        let opts = PingOptions::new()
            .count(2)
            .timeout(Duration::from_millis(500))
            .packet_size(100)
            .normalized(PingPlatform::Unix);
        assert_eq!(opts.count, 2);
        assert_eq!(opts.timeout, Duration::from_millis(500));
        assert_eq!(opts.packet_size, 100);
    }
}
