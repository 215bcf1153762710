//! Error types for calcd-core

use std::net::SocketAddr;
use thiserror::Error;

/// Result type alias for calcd operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the calcd listener
#[derive(Debug, Error)]
pub enum Error {
    /// Listener could not be bound (port in use, permission denied, ...)
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// Hostname/port pair does not form a socket address
    #[error("Invalid listen address: {0}")]
    InvalidAddress(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when the failure is a bind conflict on an address already in use
    pub fn is_addr_in_use(&self) -> bool {
        matches!(
            self,
            Error::Bind { source, .. } if source.kind() == std::io::ErrorKind::AddrInUse
        )
    }
}
