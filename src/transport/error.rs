//! Errors raised by transport adapters.

use std::io;

use thiserror::Error;
use tokio_util::codec::LinesCodecError;

/// Failure to exchange frames with the broker.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connecting or writing to the broker failed.
    #[error("transport error: {0}")]
    Io(#[from] io::Error),
    /// A frame could not be read or written.
    #[error("framing error: {0}")]
    Frame(#[from] LinesCodecError),
    /// An outbound frame could not be serialized.
    #[error("cannot encode frame: {0}")]
    Encode(#[source] serde_json::Error),
    /// The broker connection is gone.
    #[error("connection closed")]
    Closed,
    /// The broker or adapter refused the operation.
    #[error("{0}")]
    Rejected(String),
}
