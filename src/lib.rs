//! Scripted conversation tests for chat bots.
//!
//! A script lists named tests, each a sequence of steps. The harness sends
//! a stimulus to the bot, waits until the bot finishes its turn, checks the
//! received text lines and buttons against the step's assertions, then
//! sends the step's response and moves on.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod evaluate;
pub mod event;
pub mod receiver;
pub mod report;
pub mod runner;
pub mod script;
pub mod sequencer;
pub mod state;
pub mod transport;

#[cfg(test)]
mod test_helpers;

pub use config::RunConfig;
pub use dispatch::{Dispatcher, Package, Stimulus};
pub use error::RunnerError;
pub use event::{BotEvent, Button};
pub use receiver::{EventSink, TurnError, TurnReceiver, event_queue};
pub use report::{ConsoleReporter, Reporter};
pub use runner::run;
pub use script::{Assertion, Response, ScriptDocument, Step, TestScript};
pub use sequencer::{Sequencer, StepFailure, StepPosition, SuiteReport, TestFailure, TestOutcome};
pub use state::{DialogueState, TurnId};
pub use transport::{LineTransport, Transport, TransportError};
