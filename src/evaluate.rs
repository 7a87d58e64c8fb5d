//! Checks script assertions against the dialogue state.

use thiserror::Error;

use crate::{
    script::{Assertion, AssertionKind},
    state::DialogueState,
};

/// Why an assertion did not hold.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssertionFailure {
    /// The value at the index differs from the expected one.
    #[error("{kind:?} #{index}: expected {expected:?}, received {received:?}")]
    Mismatch {
        kind: AssertionKind,
        index: usize,
        expected: String,
        received: String,
    },
    /// The index lies beyond what the bot sent in this turn.
    #[error("{kind:?} #{index}: expected {expected:?}, but only {len} received")]
    OutOfRange {
        kind: AssertionKind,
        index: usize,
        expected: String,
        len: usize,
    },
}

/// Evaluate one assertion by exact string equality.
///
/// Text assertions inspect received messages, button assertions inspect
/// button labels. Assertions of any other kind hold vacuously.
///
/// # Errors
///
/// Returns [`AssertionFailure`] on a mismatch or an out-of-range index.
pub fn evaluate(assertion: &Assertion, state: &DialogueState) -> Result<(), AssertionFailure> {
    let (received, len) = match assertion.kind {
        AssertionKind::Text => (state.message(assertion.index), state.messages().len()),
        AssertionKind::Button => (
            state.button(assertion.index).map(|b| b.text.as_str()),
            state.buttons().len(),
        ),
        AssertionKind::Other => return Ok(()),
    };
    match received {
        Some(received) if received == assertion.value => Ok(()),
        Some(received) => Err(AssertionFailure::Mismatch {
            kind: assertion.kind,
            index: assertion.index,
            expected: assertion.value.clone(),
            received: received.to_owned(),
        }),
        None => Err(AssertionFailure::OutOfRange {
            kind: assertion.kind,
            index: assertion.index,
            expected: assertion.value.clone(),
            len,
        }),
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::{AssertionFailure, evaluate};
    use crate::{
        event::{BotEvent, Button},
        script::{Assertion, AssertionKind},
        state::DialogueState,
    };

    #[fixture]
    fn state() -> DialogueState {
        let mut state = DialogueState::new();
        state.apply(&BotEvent::text("hi"));
        state.apply(&BotEvent::buttons("choose", vec![Button::new("A", "p1")]));
        state
    }

    #[rstest]
    #[case::text(Assertion::text(0, "hi"))]
    #[case::prompt(Assertion::text(1, "choose"))]
    #[case::button(Assertion::button(0, "A"))]
    fn matching_values_pass(state: DialogueState, #[case] assertion: Assertion) {
        assert_eq!(evaluate(&assertion, &state), Ok(()));
    }

    #[rstest]
    fn mismatch_reports_both_values(state: DialogueState) {
        assert_eq!(
            evaluate(&Assertion::text(0, "bye"), &state),
            Err(AssertionFailure::Mismatch {
                kind: AssertionKind::Text,
                index: 0,
                expected: "bye".into(),
                received: "hi".into(),
            })
        );
    }

    #[rstest]
    fn button_compares_label_not_payload(state: DialogueState) {
        assert!(evaluate(&Assertion::button(0, "p1"), &state).is_err());
    }

    #[rstest]
    #[case::text(Assertion::text(2, "x"), 2)]
    #[case::button(Assertion::button(1, "B"), 1)]
    fn out_of_range_fails(
        state: DialogueState,
        #[case] assertion: Assertion,
        #[case] expected_len: usize,
    ) {
        let err = evaluate(&assertion, &state).expect_err("assertion should fail");
        assert!(matches!(err, AssertionFailure::OutOfRange { len, .. } if len == expected_len));
    }

    #[test]
    fn other_kinds_hold_vacuously() {
        let assertion = Assertion {
            kind: AssertionKind::Other,
            index: 99,
            value: "anything".into(),
        };
        assert_eq!(evaluate(&assertion, &DialogueState::new()), Ok(()));
    }
}
