//! Step-by-step execution of dialogue tests.
//!
//! The sequencer owns the dialogue state and the receiving end of the
//! event queue. For each test it sends the opening stimulus and waits for
//! the bot's turn, then walks the steps: evaluate assertions, resolve the
//! response, clear the state, publish the stimulus and wait for the next
//! turn. The final step only evaluates assertions.

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::{
    config::RunConfig,
    dispatch::{Dispatcher, Stimulus},
    evaluate::evaluate,
    receiver::{TurnError, TurnReceiver},
    report::Reporter,
    script::TestScript,
    state::{DialogueState, TurnId},
    transport::Transport,
};

mod outcome;

pub use outcome::{StepFailure, StepPosition, SuiteReport, TestFailure, TestOutcome};

/// Drives tests against a bot one turn at a time.
pub struct Sequencer<T, R> {
    dispatcher: Dispatcher<T>,
    turns: TurnReceiver,
    state: DialogueState,
    reporter: R,
    config: RunConfig,
}

impl<T: Transport, R: Reporter> Sequencer<T, R> {
    #[must_use]
    pub fn new(dispatcher: Dispatcher<T>, turns: TurnReceiver, reporter: R, config: RunConfig) -> Self {
        Self {
            dispatcher,
            turns,
            state: DialogueState::new(),
            reporter,
            config,
        }
    }

    /// Dialogue state as left by the last operation.
    #[must_use]
    pub fn state(&self) -> &DialogueState { &self.state }

    #[must_use]
    pub fn reporter(&self) -> &R { &self.reporter }

    /// Run tests in order.
    ///
    /// Unless [`RunConfig::keep_going`] is set, the suite stops at the first
    /// failing test and the remaining tests are counted as skipped.
    /// Otherwise the state and any pending events are discarded after a
    /// failure and the next test starts afresh.
    pub async fn run_suite(&mut self, tests: &[TestScript]) -> SuiteReport {
        let mut report = SuiteReport::default();
        for test in tests {
            let outcome = self.run_test(test).await;
            let passed = outcome.passed();
            report.outcomes.push(outcome);
            if !passed {
                if !self.config.keep_going {
                    break;
                }
                self.reset();
            }
        }
        report.skipped = tests.len() - report.outcomes.len();
        if report.all_passed() {
            self.reporter.finished();
        }
        info!(
            ran = report.outcomes.len(),
            failed = report.failures().count(),
            skipped = report.skipped,
            "suite finished"
        );
        report
    }

    /// Run a single test and report its outcome.
    pub async fn run_test(&mut self, test: &TestScript) -> TestOutcome {
        let started = Instant::now();
        info!(test = %test.name, steps = test.steps.len(), "starting test");
        self.reporter.test_started(&test.name);

        let result = self.drive(test).await;
        let elapsed = started.elapsed();
        match &result {
            Ok(()) => {
                info!(test = %test.name, ?elapsed, "test passed");
                self.reporter.test_passed(&test.name, elapsed);
            }
            Err(failure) => {
                warn!(test = %test.name, %failure, "test failed");
                self.reporter.step_failed(&failure.failure);
            }
        }
        TestOutcome {
            name: test.name.clone(),
            elapsed,
            result,
        }
    }

    async fn drive(&mut self, test: &TestScript) -> Result<(), TestFailure> {
        self.turns.open_turn(self.state.turn());
        self.dispatcher
            .dispatch(&self.config.opening_stimulus())
            .await
            .map_err(|e| {
                TestFailure::new(StepPosition::Start, StepFailure::Dispatch(e.to_string()))
            })?;
        let mut turn = self
            .await_turn()
            .await
            .map_err(|e| TestFailure::new(StepPosition::Start, e))?;

        let Some(last) = test.steps.len().checked_sub(1) else {
            self.state.clear();
            return Ok(());
        };
        for (index, step) in test.steps.iter().enumerate() {
            let position = StepPosition::Step(index);
            self.reporter.step_started(index);
            for assertion in &step.asserts {
                evaluate(assertion, &self.state).map_err(|e| TestFailure::new(position, e))?;
                self.reporter.assertion_passed(assertion);
            }

            if index == last {
                self.state.clear();
                break;
            }

            let stimulus = Stimulus::for_response(&step.response, &self.state, turn)
                .map_err(|e| TestFailure::new(position, e))?;
            self.state.clear();
            self.turns.open_turn(self.state.turn());
            if let Some(stimulus) = stimulus {
                self.stimulate(&stimulus).await;
            }
            turn = self
                .await_turn()
                .await
                .map_err(|e| TestFailure::new(position, e))?;
        }
        Ok(())
    }

    async fn stimulate(&self, stimulus: &Stimulus) {
        // A lost step response surfaces as a missing reply, not a failure here.
        let _ = self.dispatcher.dispatch(stimulus).await;
    }

    async fn await_turn(&mut self) -> Result<TurnId, TurnError> {
        let turn = self
            .turns
            .next_turn(&mut self.state, self.config.reply_timeout)
            .await?;
        debug!(
            %turn,
            messages = self.state.messages().len(),
            buttons = self.state.buttons().len(),
            "bot turn complete"
        );
        Ok(turn)
    }

    fn reset(&mut self) {
        self.state.clear();
        self.turns.drain_pending();
    }
}
