//! Run configuration.
//!
//! [`RunConfig`] gathers the knobs that shape a run: how long to wait for
//! the bot, how many inbound events may queue up, and whether the suite
//! stops at the first failing test.

use std::time::Duration;

use crate::{
    dispatch::{START_TEXT, Stimulus},
    receiver::DEFAULT_QUEUE_CAPACITY,
};

/// Settings for a scripted run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfig {
    /// Longest wait for the bot to finish a turn. `None` waits forever.
    pub reply_timeout: Option<Duration>,
    /// Capacity of the inbound event queue.
    pub queue_capacity: usize,
    /// Continue with the next test after a failure.
    pub keep_going: bool,
    /// Text sent to open each test's conversation.
    pub start_text: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            reply_timeout: None,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            keep_going: false,
            start_text: START_TEXT.to_owned(),
        }
    }
}

impl RunConfig {
    /// Set the reply timeout; `None` disables the bound.
    #[must_use]
    pub fn reply_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.reply_timeout = timeout;
        self
    }

    /// Set the event queue capacity. Zero is raised to one.
    #[must_use]
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    #[must_use]
    pub fn keep_going(mut self, keep_going: bool) -> Self {
        self.keep_going = keep_going;
        self
    }

    #[must_use]
    pub fn start_text(mut self, text: impl Into<String>) -> Self {
        self.start_text = text.into();
        self
    }

    /// Stimulus sent to open each test's conversation.
    #[must_use]
    pub fn opening_stimulus(&self) -> Stimulus { Stimulus::Text(self.start_text.clone()) }
}
