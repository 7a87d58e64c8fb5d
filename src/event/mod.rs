//! Inbound bot events.
//!
//! Events arrive on the conversation channel as JSON objects tagged by a
//! `type` field. They are decoded into the closed [`BotEvent`] union at the
//! receiver boundary; anything that does not fit is rejected explicitly.

use serde::{Deserialize, Serialize};

mod error;

pub use error::EventError;

/// A selectable option offered by the bot.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Button {
    /// Label shown to the user.
    pub text: String,
    /// Opaque token echoed back to select this button.
    pub reply_payload: String,
}

impl Button {
    #[must_use]
    pub fn new(text: impl Into<String>, reply_payload: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            reply_payload: reply_payload.into(),
        }
    }
}

/// One event published by the bot.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BotEvent {
    /// A line of text. More may follow in the same turn.
    Text { text: String },
    /// A prompt with a set of buttons. Ends the bot's turn.
    Buttons { text: String, buttons: Vec<Button> },
    /// The bot waits for free text. Ends the bot's turn.
    #[serde(rename = "input")]
    InputPrompt,
    /// Any other event type; ignored.
    #[serde(other)]
    Other,
}

impl BotEvent {
    /// Build a text event.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self { Self::Text { text: text.into() } }

    /// Build a buttons event.
    #[must_use]
    pub fn buttons(text: impl Into<String>, buttons: Vec<Button>) -> Self {
        Self::Buttons {
            text: text.into(),
            buttons,
        }
    }

    /// Decode an event from its wire representation.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Decode`] if the value is not an object with a
    /// string `type`, or if a known type lacks its required fields.
    pub fn decode(value: serde_json::Value) -> Result<Self, EventError> {
        serde_json::from_value(value).map_err(EventError::Decode)
    }

    /// Encode the event in its wire representation.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Encode`] if serialization fails.
    pub fn encode(&self) -> Result<serde_json::Value, EventError> {
        serde_json::to_value(self).map_err(EventError::Encode)
    }

    /// Whether this event marks the end of the bot's turn.
    #[must_use]
    pub fn is_turn_terminal(&self) -> bool { matches!(self, Self::Buttons { .. } | Self::InputPrompt) }
}
