//! Results of running tests.

use std::time::Duration;

use thiserror::Error;

use crate::{evaluate::AssertionFailure, receiver::TurnError, state::StateError};

/// Reason a test stopped early.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StepFailure {
    /// The bot's reply did not match the script.
    #[error("assertion failed: {0}")]
    Assertion(#[from] AssertionFailure),
    /// The bot did not complete its turn.
    #[error("waiting for reply: {0}")]
    Turn(#[from] TurnError),
    /// A click response could not be matched to an offered button.
    #[error("cannot click: {0}")]
    Click(#[from] StateError),
    /// The opening stimulus could not be published.
    #[error("cannot send opening stimulus: {0}")]
    Dispatch(String),
}

/// Where in a test a failure occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepPosition {
    /// Sending the opening stimulus or waiting for its reply.
    Start,
    /// Inside the step with this index.
    Step(usize),
}

impl std::fmt::Display for StepPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::Step(index) => write!(f, "step #{index}"),
        }
    }
}

/// A failure together with its position.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{position}: {failure}")]
pub struct TestFailure {
    pub position: StepPosition,
    #[source]
    pub failure: StepFailure,
}

impl TestFailure {
    pub(crate) fn new(position: StepPosition, failure: impl Into<StepFailure>) -> Self {
        Self {
            position,
            failure: failure.into(),
        }
    }
}

/// Outcome of one test.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestOutcome {
    pub name: String,
    pub elapsed: Duration,
    pub result: Result<(), TestFailure>,
}

impl TestOutcome {
    #[must_use]
    pub fn passed(&self) -> bool { self.result.is_ok() }
}

/// Outcomes of a suite, in script order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SuiteReport {
    pub outcomes: Vec<TestOutcome>,
    /// Tests never started because the suite stopped early.
    pub skipped: usize,
}

impl SuiteReport {
    /// Whether every test ran and passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.skipped == 0 && self.outcomes.iter().all(TestOutcome::passed)
    }

    /// Failed tests with their failures.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &TestFailure)> {
        self.outcomes.iter().filter_map(|outcome| {
            outcome
                .result
                .as_ref()
                .err()
                .map(|failure| (outcome.name.as_str(), failure))
        })
    }
}
