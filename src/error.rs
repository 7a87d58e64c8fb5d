//! Setup errors that prevent a run from starting.

use thiserror::Error;

use crate::{script::ScriptError, transport::TransportError};

/// Fatal error raised before any test runs.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The script could not be loaded.
    #[error(transparent)]
    Script(#[from] ScriptError),
    /// The broker could not be reached.
    #[error("cannot connect to broker: {0}")]
    Connect(#[source] TransportError),
    /// Subscribing to the conversation topic failed.
    #[error("cannot subscribe to {topic}: {source}")]
    Subscribe {
        topic: String,
        #[source]
        source: TransportError,
    },
}
