//! Connection-level errors.
//!
//! Only transport failures are errors.  Protocol anomalies (timeouts, malformed
//! JSON, empty role lists) are absorbed by the handshake and logged as
//! warnings, so they never show up here.

use nel_core::protocol::CodecError;
use thiserror::Error;

/// Errors that end a probe run.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// TCP connection to the server failed.
    #[error("failed to connect to {addr}: {source}")]
    ConnectFailed {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    /// An I/O error occurred on the established connection.
    #[error("connection I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// An outbound message could not be encoded.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
    /// The server closed the connection while a reply was still expected.
    #[error("connection closed by server")]
    ConnectionClosed,
}
