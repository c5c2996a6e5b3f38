//! Error types for the queen.

use thiserror::Error;

/// Result type for queen operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can surface from the coordinator.
///
/// Misbehaving peers never produce one of these: malformed messages are
/// dropped, stale references ignored, and disconnects are ordinary
/// lifecycle events. What remains is startup plumbing.
#[derive(Debug, Error)]
pub enum Error {
    /// Listener or socket failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid listen or advertise address
    #[error("Invalid address: {0}")]
    Addr(#[from] std::net::AddrParseError),
}
