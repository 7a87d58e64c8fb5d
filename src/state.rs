//! Per-turn accumulator of what the bot has said.
//!
//! The state is owned by the sequencer and mutated only on its task. It
//! holds the text lines received since the last clear and the button set
//! offered by the most recent `buttons` event, stamped with the turn it
//! arrived in. Events stamped with an earlier turn are late: they never
//! complete the current turn, and late buttons stay tagged with their own
//! turn so a click on them is rejected.

use thiserror::Error;

use crate::event::{BotEvent, Button};

/// Identifier of a dialogue turn. Advances every time the state is cleared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TurnId(u64);

impl TurnId {
    pub(crate) fn new(id: u64) -> Self { Self(id) }

    #[must_use]
    pub fn get(self) -> u64 { self.0 }

    fn next(self) -> Self { Self(self.0.wrapping_add(1)) }
}

impl std::fmt::Display for TurnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

/// Whether applying an event finished the bot's turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnSignal {
    Pending,
    Complete,
}

/// Buttons offered during a particular turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ButtonSet {
    pub turn: TurnId,
    pub buttons: Vec<Button>,
}

/// Errors raised when resolving a click against the current buttons.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    /// No buttons were offered in this turn.
    #[error("no buttons offered in turn {turn}")]
    NoButtons { turn: TurnId },
    /// The buttons on hand belong to a different turn than requested.
    #[error("buttons were offered in turn {offered}, click targets turn {requested}")]
    StaleButtons { offered: TurnId, requested: TurnId },
    /// The click index is outside the offered buttons.
    #[error("button index {index} out of range; {len} button(s) offered")]
    ButtonOutOfRange { index: usize, len: usize },
}

/// Messages and buttons received since the last clear.
#[derive(Debug, Default)]
pub struct DialogueState {
    turn: TurnId,
    messages: Vec<String>,
    buttons: Option<ButtonSet>,
}

impl DialogueState {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Turn currently being accumulated.
    #[must_use]
    pub fn turn(&self) -> TurnId { self.turn }

    /// Fold one bot event of the current turn into the state.
    ///
    /// Text lines are appended. A `buttons` event appends its prompt and
    /// replaces the button set. Only `buttons` and `input` complete the
    /// turn; other event types leave the state untouched.
    pub fn apply(&mut self, event: &BotEvent) -> TurnSignal { self.apply_from(event, self.turn) }

    /// Fold an event that arrived while `turn` was open.
    ///
    /// Events from an earlier turn are late. Late buttons replace the
    /// button set under their own turn; every other late event is ignored.
    /// A late event never completes the turn.
    pub fn apply_from(&mut self, event: &BotEvent, turn: TurnId) -> TurnSignal {
        let late = turn < self.turn;
        match event {
            BotEvent::Text { text } if !late => self.messages.push(text.clone()),
            BotEvent::Buttons { text, buttons } => {
                if !late {
                    self.messages.push(text.clone());
                }
                self.buttons = Some(ButtonSet {
                    turn,
                    buttons: buttons.clone(),
                });
            }
            _ => {}
        }
        if event.is_turn_terminal() && !late {
            TurnSignal::Complete
        } else {
            TurnSignal::Pending
        }
    }

    /// Empty both lists and move to the next turn.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.buttons = None;
        self.turn = self.turn.next();
    }

    #[must_use]
    pub fn messages(&self) -> &[String] { &self.messages }

    /// Buttons offered in the current turn.
    #[must_use]
    pub fn buttons(&self) -> &[Button] {
        self.buttons
            .as_ref()
            .filter(|set| set.turn == self.turn)
            .map(|set| set.buttons.as_slice())
            .unwrap_or(&[])
    }

    #[must_use]
    pub fn message(&self, index: usize) -> Option<&str> {
        self.messages.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn button(&self, index: usize) -> Option<&Button> { self.buttons().get(index) }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.messages.is_empty() && self.buttons.is_none() }

    /// Reply payload of the button at `index`, offered in turn `turn`.
    ///
    /// # Errors
    ///
    /// Returns [`StateError`] if no buttons are on hand, if they were
    /// offered in another turn, or if `index` is out of range.
    pub fn click_payload(&self, index: usize, turn: TurnId) -> Result<&str, StateError> {
        let set = self
            .buttons
            .as_ref()
            .ok_or(StateError::NoButtons { turn: self.turn })?;
        if set.turn != turn {
            return Err(StateError::StaleButtons {
                offered: set.turn,
                requested: turn,
            });
        }
        set.buttons
            .get(index)
            .map(|button| button.reply_payload.as_str())
            .ok_or(StateError::ButtonOutOfRange {
                index,
                len: set.buttons.len(),
            })
    }
}
