//! Errors produced while converting bot events to and from JSON.

use thiserror::Error;

/// Failure to convert between a [`super::BotEvent`] and its wire form.
#[derive(Debug, Error)]
pub enum EventError {
    /// The inbound value does not describe a bot event.
    #[error("malformed bot event: {0}")]
    Decode(#[source] serde_json::Error),
    /// The event could not be serialized.
    #[error("cannot encode bot event: {0}")]
    Encode(#[source] serde_json::Error),
}
