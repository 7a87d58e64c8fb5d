//! In-memory model of a dialogue script.
//!
//! A script document is loaded once before the run and is read-only
//! afterwards. Nothing here validates structure up front: an index that
//! does not fit the dialogue is reported where it is used.

use std::{fs, path::Path};

use serde::Deserialize;

mod error;

pub use error::ScriptError;

/// Topic on which stimuli are posted to the bot backend.
pub const POST_TOPIC: &str = "message.post";

/// A complete script: connection identity plus the ordered tests.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ScriptDocument {
    #[serde(default)]
    pub config: ScriptConfig,
    #[serde(default)]
    pub tests: Vec<TestScript>,
}

/// Identity used when talking to the bot.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct ScriptConfig {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "botToken")]
    pub bot_token: String,
}

/// A named test made of ordered steps.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct TestScript {
    pub name: String,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One step: assertions over the last bot turn and the user's reaction.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct Step {
    #[serde(default)]
    pub asserts: Vec<Assertion>,
    #[serde(default)]
    pub response: Response,
}

/// Which part of the dialogue state an [`Assertion`] inspects.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AssertionKind {
    Text,
    Button,
    /// Unrecognised or missing kinds always pass.
    #[default]
    #[serde(other)]
    Other,
}

/// Expected value at a position of the current turn.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Assertion {
    #[serde(rename = "type", default)]
    pub kind: AssertionKind,
    #[serde(default)]
    pub index: usize,
    #[serde(default)]
    pub value: String,
}

/// What the simulated user does after a step's assertions pass.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    Text,
    Click,
    #[default]
    #[serde(other)]
    None,
}

/// Response directive of a [`Step`].
///
/// `value` is used by [`ResponseKind::Text`], `index` by
/// [`ResponseKind::Click`].
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct Response {
    #[serde(rename = "type", default)]
    pub kind: ResponseKind,
    #[serde(default)]
    pub index: usize,
    #[serde(default)]
    pub value: String,
}

impl Response {
    /// Free-text reply.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            kind: ResponseKind::Text,
            index: 0,
            value: value.into(),
        }
    }

    /// Click on the button at `index` of the current turn.
    #[must_use]
    pub fn click(index: usize) -> Self {
        Self {
            kind: ResponseKind::Click,
            index,
            value: String::new(),
        }
    }
}

impl Assertion {
    #[must_use]
    pub fn text(index: usize, value: impl Into<String>) -> Self {
        Self {
            kind: AssertionKind::Text,
            index,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn button(index: usize, value: impl Into<String>) -> Self {
        Self {
            kind: AssertionKind::Button,
            index,
            value: value.into(),
        }
    }
}

impl ScriptDocument {
    /// Read and parse a script file.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Read`] if the file cannot be read and
    /// [`ScriptError::Parse`] if it is not a valid script document.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ScriptError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Parse a script document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Parse`] on malformed input.
    pub fn from_json(raw: &str) -> Result<Self, ScriptError> {
        serde_json::from_str(raw).map_err(ScriptError::Parse)
    }

    /// Conversation channel carrying the bot's replies for this identity.
    #[must_use]
    pub fn topic(&self) -> String {
        format!("chat-{}-{}", self.config.bot_token, self.config.user_id)
    }
}
