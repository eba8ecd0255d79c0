//! Tracing targets used by the diagnostics crate.
//!
//! The crate only emits events; installing a subscriber is up to the
//! application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_netdiag=debug")
//!     .init();
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Crate root target.
    pub const NETDIAG: &str = "horizon_netdiag";
    /// Command path resolution.
    pub const COMMAND: &str = "horizon_netdiag::command";
    /// Configuration discovery (Linux and Windows parsers).
    pub const DISCOVERY: &str = "horizon_netdiag::discovery";
    /// Configuration cache.
    pub const CACHE: &str = "horizon_netdiag::cache";
    /// Ping driver.
    pub const PING: &str = "horizon_netdiag::ping";
    /// DNS resolution layer.
    pub const DNS: &str = "horizon_netdiag::dns";
}
