//! Human-readable progress lines.

use std::{io::Write, time::Duration};

use crate::{
    evaluate::AssertionFailure,
    script::{Assertion, AssertionKind},
    sequencer::StepFailure,
};

/// Receives progress notifications from the sequencer.
pub trait Reporter: Send {
    fn test_started(&mut self, name: &str);
    fn step_started(&mut self, index: usize);
    fn assertion_passed(&mut self, assertion: &Assertion);
    fn step_failed(&mut self, failure: &StepFailure);
    fn test_passed(&mut self, name: &str, elapsed: Duration);
    fn finished(&mut self);
}

/// Writes one line per notification. Write errors are ignored.
pub struct ConsoleReporter<W> {
    out: W,
}

impl ConsoleReporter<std::io::Stdout> {
    #[must_use]
    pub fn stdout() -> Self { Self::new(std::io::stdout()) }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self { Self { out } }

    pub fn get_ref(&self) -> &W { &self.out }

    pub fn into_inner(self) -> W { self.out }

    fn line(&mut self, args: std::fmt::Arguments<'_>) {
        let _ = self.out.write_fmt(args);
        let _ = self.out.write_all(b"\n");
    }
}

impl<W: Write + Send> Reporter for ConsoleReporter<W> {
    fn test_started(&mut self, name: &str) { self.line(format_args!("STARTING TEST {name}")); }

    fn step_started(&mut self, index: usize) { self.line(format_args!("STEP #{index}")); }

    fn assertion_passed(&mut self, assertion: &Assertion) {
        let kind = match assertion.kind {
            AssertionKind::Text => "TEXT",
            AssertionKind::Button => "BUTTON",
            AssertionKind::Other => return,
        };
        self.line(format_args!("OK ASSERT {kind} {}", assertion.value));
    }

    fn step_failed(&mut self, failure: &StepFailure) {
        match failure {
            StepFailure::Assertion(AssertionFailure::Mismatch {
                expected, received, ..
            }) => self.line(format_args!("FAIL EXPECTED {expected} RECEIVED {received}")),
            StepFailure::Assertion(AssertionFailure::OutOfRange { expected, len, .. }) => self
                .line(format_args!(
                    "FAIL EXPECTED {expected} RECEIVED nothing ({len} available)"
                )),
            other => self.line(format_args!("FAIL {other}")),
        }
    }

    fn test_passed(&mut self, name: &str, elapsed: Duration) {
        self.line(format_args!("END TEST {name} STATUS OK TIME {elapsed:?}\n"));
    }

    fn finished(&mut self) { self.line(format_args!("Done")); }
}
