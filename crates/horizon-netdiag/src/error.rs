//! Error types for the diagnostics module.

use thiserror::Error;

/// Network diagnostics errors.
#[derive(Debug, Clone, Error)]
pub enum NetdiagError {
    /// Caller supplied an unusable argument (empty host or domain).
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// A tool required for this operation could not be located.
    #[error("Command not found: {0}")]
    ToolUnavailable(String),
    /// An external command ran but reported failure.
    #[error("Command `{command}` failed: {message}")]
    CommandFailed {
        /// The command that was run.
        command: String,
        /// Exit status or captured output.
        message: String,
    },
    /// Tool output did not have the expected shape.
    #[error("Unexpected {tool} output: {message}")]
    UnexpectedOutput {
        /// Tool whose output was being parsed.
        tool: String,
        /// What was wrong with it.
        message: String,
    },
    /// No OS interface matched the discovered name or address.
    #[error("Network interface not found: {0}")]
    InterfaceNotFound(String),
    /// The interface exists but reports no hardware address.
    #[error("Interface {0} has no hardware address")]
    MissingHardwareAddress(String),
    /// Interface name contains shell metacharacters.
    #[error("Invalid interface name: {0:?}")]
    InvalidInterfaceName(String),
    /// DNS resolution error.
    #[error("DNS error: {0}")]
    Dns(String),
    /// Operation exceeded its time bound.
    #[error("Operation timed out")]
    Timeout,
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),
}

impl NetdiagError {
    /// Returns `true` for errors caused by the caller's arguments.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Returns `true` when discovery was aborted by name sanitization.
    pub fn is_security_error(&self) -> bool {
        matches!(self, Self::InvalidInterfaceName(_))
    }
}

impl From<std::io::Error> for NetdiagError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::TimedOut {
            Self::Timeout
        } else {
            Self::Io(err.to_string())
        }
    }
}

impl From<tokio::time::error::Elapsed> for NetdiagError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        Self::Timeout
    }
}

/// A specialized Result type for diagnostics operations.
pub type Result<T> = std::result::Result<T, NetdiagError>;
