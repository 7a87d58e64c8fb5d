//! Translation of script responses into outbound stimuli.
//!
//! A stimulus simulates a user action. It is wrapped in a [`Package`]
//! carrying the user identity and bot token and published on
//! [`POST_TOPIC`]. Publishing failures are reported to the caller but are
//! not fatal to the run.

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::{
    script::{POST_TOPIC, Response, ResponseKind, ScriptConfig},
    state::{DialogueState, StateError, TurnId},
    transport::{Transport, TransportError},
};

/// Text sent to start every test.
pub const START_TEXT: &str = "/start";

/// Simulated user action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Stimulus {
    /// Free text typed by the user.
    Text(String),
    /// Selection of a button by its reply payload.
    Click { reply_payload: String },
}

impl Stimulus {
    /// Resolve a script response against the buttons offered in `turn`.
    ///
    /// Returns `Ok(None)` for responses that send nothing.
    ///
    /// # Errors
    ///
    /// Returns [`StateError`] if a click cannot be matched to a button of
    /// `turn`.
    pub fn for_response(
        response: &Response,
        state: &DialogueState,
        turn: TurnId,
    ) -> Result<Option<Self>, StateError> {
        match response.kind {
            ResponseKind::Text => Ok(Some(Self::Text(response.value.clone()))),
            ResponseKind::Click => {
                let reply_payload = state.click_payload(response.index, turn)?.to_owned();
                Ok(Some(Self::Click { reply_payload }))
            }
            ResponseKind::None => Ok(None),
        }
    }
}

/// Sender identity as seen by the bot backend.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct User {
    pub ext_id: String,
}

/// Message body of an outbound [`Package`].
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutboundMessage {
    Text { text: String },
    Button { reply_payload: String },
}

impl From<&Stimulus> for OutboundMessage {
    fn from(stimulus: &Stimulus) -> Self {
        match stimulus {
            Stimulus::Text(text) => Self::Text { text: text.clone() },
            Stimulus::Click { reply_payload } => Self::Button {
                reply_payload: reply_payload.clone(),
            },
        }
    }
}

/// Wire envelope posted to the bot backend.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Package {
    pub user: User,
    pub message: OutboundMessage,
    pub token: String,
}

/// Publishes stimuli on behalf of one user.
pub struct Dispatcher<T> {
    transport: T,
    config: ScriptConfig,
}

impl<T: Transport> Dispatcher<T> {
    #[must_use]
    pub fn new(transport: T, config: ScriptConfig) -> Self { Self { transport, config } }

    /// Envelope for `stimulus` addressed from the configured user.
    #[must_use]
    pub fn package(&self, stimulus: &Stimulus) -> Package {
        Package {
            user: User {
                ext_id: self.config.user_id.clone(),
            },
            message: stimulus.into(),
            token: self.config.bot_token.clone(),
        }
    }

    /// Publish `stimulus`.
    ///
    /// Failures are logged here; callers decide whether to carry on.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the package cannot be encoded or
    /// published.
    pub async fn dispatch(&self, stimulus: &Stimulus) -> Result<(), TransportError> {
        let result = match serde_json::to_value(self.package(stimulus)) {
            Ok(package) => self.transport.publish(POST_TOPIC, package).await,
            Err(e) => Err(TransportError::Encode(e)),
        };
        match &result {
            Ok(()) => debug!(?stimulus, "stimulus published"),
            Err(e) => error!(?stimulus, error = %e, "failed to publish stimulus"),
        }
        result
    }
}
