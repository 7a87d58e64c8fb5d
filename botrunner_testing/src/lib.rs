//! Utilities for driving the `botrunner` sequencer against an in-process
//! bot during tests.
//!
//! [`StubBot`] implements [`botrunner::Transport`] and answers each
//! published stimulus with a canned list of events, delivered from a
//! separate task the way a network transport would.
//!
//! ```rust
//! use botrunner::BotEvent;
//! use botrunner_testing::StubBot;
//!
//! let bot = StubBot::new()
//!     .on_text("/start", [BotEvent::text("hi"), BotEvent::InputPrompt]);
//! # let _ = bot;
//! ```

pub mod logging;
pub mod script;
pub mod stub_bot;

pub use logging::{LoggerHandle, logger};
pub use script::{document, step, test};
pub use stub_bot::StubBot;
