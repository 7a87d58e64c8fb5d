//! Behaviour of the test sequencer against a stub bot.
//!
//! Covers assertion evaluation per turn, click resolution, terminal steps,
//! publish failures, timeouts and late events.

mod common;

use std::time::Duration;

use botrunner::{
    Assertion,
    BotEvent,
    Button,
    Response,
    RunConfig,
    StepFailure,
    StepPosition,
    TurnError,
    dispatch::OutboundMessage,
    evaluate::AssertionFailure,
    script::AssertionKind,
    state::StateError,
};
use botrunner_testing::{StubBot, step, test};
use common::{output, sequencer};
use rstest::rstest;

fn greeter() -> StubBot { StubBot::new().on_text("/start", [BotEvent::text("hi"), BotEvent::InputPrompt]) }

fn chooser() -> StubBot {
    StubBot::new()
        .on_text(
            "/start",
            [BotEvent::buttons(
                "choose",
                vec![Button::new("A", "p1"), Button::new("B", "p2")],
            )],
        )
        .on_click("p1", [BotEvent::text("picked A"), BotEvent::InputPrompt])
        .on_click("p2", [BotEvent::text("picked B"), BotEvent::InputPrompt])
}

fn text(text: &str) -> OutboundMessage { OutboundMessage::Text { text: text.into() } }

#[tokio::test]
async fn matching_text_passes() {
    let bot = greeter();
    let mut seq = sequencer(&bot, RunConfig::default()).await;

    let outcome = seq
        .run_test(&test("hello", [step([Assertion::text(0, "hi")], Response::default())]))
        .await;

    assert_eq!(outcome.result, Ok(()));
    assert!(seq.state().is_empty());
    assert_eq!(bot.received_messages(), vec![text("/start")]);
    let out = output(&seq);
    assert!(out.contains("OK ASSERT TEXT hi"));
    assert!(out.contains("END TEST hello STATUS OK"));
}

#[tokio::test]
async fn mismatching_text_fails_and_skips_remaining_steps() {
    let bot = greeter().on_text("go", [BotEvent::InputPrompt]);
    let mut seq = sequencer(&bot, RunConfig::default()).await;

    let outcome = seq
        .run_test(&test(
            "hello",
            [
                step([Assertion::text(0, "bye")], Response::text("go")),
                step([], Response::default()),
            ],
        ))
        .await;

    let failure = outcome.result.expect_err("test should fail");
    assert_eq!(failure.position, StepPosition::Step(0));
    assert_eq!(
        failure.failure,
        StepFailure::Assertion(AssertionFailure::Mismatch {
            kind: AssertionKind::Text,
            index: 0,
            expected: "bye".into(),
            received: "hi".into(),
        })
    );
    assert_eq!(bot.received_messages(), vec![text("/start")]);
    assert!(output(&seq).contains("FAIL EXPECTED bye RECEIVED hi"));
}

#[rstest]
#[case::second(1, "B", "p2")]
#[case::first(0, "A", "p1")]
#[tokio::test]
async fn click_publishes_selected_payload(
    #[case] index: usize,
    #[case] label: &str,
    #[case] payload: &str,
) {
    let bot = chooser();
    let mut seq = sequencer(&bot, RunConfig::default()).await;

    let outcome = seq
        .run_test(&test(
            "choice",
            [
                step([Assertion::button(index, label)], Response::click(index)),
                step([], Response::default()),
            ],
        ))
        .await;

    assert_eq!(outcome.result, Ok(()));
    assert_eq!(
        bot.received_messages(),
        vec![
            text("/start"),
            OutboundMessage::Button {
                reply_payload: payload.into()
            }
        ]
    );
}

#[tokio::test]
async fn two_step_test_ends_without_dispatch() {
    let bot = greeter().on_text("go", [BotEvent::text("done"), BotEvent::InputPrompt]);
    let mut seq = sequencer(&bot, RunConfig::default()).await;

    let outcome = seq
        .run_test(&test(
            "flow",
            [
                step([Assertion::text(0, "hi")], Response::text("go")),
                step([Assertion::text(0, "done")], Response::text("never sent")),
            ],
        ))
        .await;

    assert_eq!(outcome.result, Ok(()));
    assert_eq!(bot.received_messages(), vec![text("/start"), text("go")]);
    assert!(seq.state().is_empty());
    let out = output(&seq);
    assert!(out.contains("STEP #0"));
    assert!(out.contains("STEP #1"));
    assert!(out.contains("END TEST flow STATUS OK TIME"));
}

#[tokio::test]
async fn out_of_range_index_fails() {
    let bot = greeter();
    let mut seq = sequencer(&bot, RunConfig::default()).await;

    let outcome = seq
        .run_test(&test("hello", [step([Assertion::text(2, "x")], Response::default())]))
        .await;

    let failure = outcome.result.expect_err("test should fail");
    assert!(matches!(
        failure.failure,
        StepFailure::Assertion(AssertionFailure::OutOfRange { index: 2, len: 1, .. })
    ));
}

#[tokio::test]
async fn assertions_see_only_the_current_turn() {
    let bot = StubBot::new()
        .on_text("/start", [BotEvent::text("one"), BotEvent::text("two"), BotEvent::InputPrompt])
        .on_text("next", [BotEvent::text("three"), BotEvent::InputPrompt]);
    let mut seq = sequencer(&bot, RunConfig::default()).await;

    let outcome = seq
        .run_test(&test(
            "turns",
            [
                step(
                    [Assertion::text(0, "one"), Assertion::text(1, "two")],
                    Response::text("next"),
                ),
                step([Assertion::text(0, "three")], Response::default()),
            ],
        ))
        .await;

    assert_eq!(outcome.result, Ok(()));
}

#[tokio::test]
async fn click_without_buttons_fails() {
    let bot = greeter();
    let mut seq = sequencer(&bot, RunConfig::default()).await;

    let outcome = seq
        .run_test(&test(
            "click",
            [step([], Response::click(0)), step([], Response::default())],
        ))
        .await;

    let failure = outcome.result.expect_err("test should fail");
    assert!(matches!(
        failure.failure,
        StepFailure::Click(StateError::NoButtons { .. })
    ));
    assert_eq!(bot.received_messages(), vec![text("/start")]);
}

#[tokio::test(start_paused = true)]
async fn silent_bot_reports_no_reply() {
    let bot = StubBot::new();
    let config = RunConfig::default().reply_timeout(Some(Duration::from_secs(2)));
    let mut seq = sequencer(&bot, config).await;

    let outcome = seq.run_test(&test("silence", [step([], Response::default())])).await;

    let failure = outcome.result.expect_err("test should time out");
    assert_eq!(failure.position, StepPosition::Start);
    assert_eq!(
        failure.failure,
        StepFailure::Turn(TurnError::Timeout(Duration::from_secs(2)))
    );
}

#[tokio::test]
async fn failed_opening_publish_fails_at_start() {
    let bot = greeter().failing_publishes(1);
    let mut seq = sequencer(&bot, RunConfig::default()).await;

    let outcome = seq.run_test(&test("lost", [step([], Response::default())])).await;

    let failure = outcome.result.expect_err("test should fail");
    assert_eq!(failure.position, StepPosition::Start);
    assert!(matches!(failure.failure, StepFailure::Dispatch(_)));
    assert!(bot.received().is_empty());
    assert!(output(&seq).contains("cannot send opening stimulus"));
}

#[tokio::test(start_paused = true)]
async fn failed_step_publish_is_not_fatal() {
    let bot = greeter()
        .on_text("go", [BotEvent::InputPrompt])
        .failing_publishes_after(1, 1);
    let config = RunConfig::default().reply_timeout(Some(Duration::from_secs(1)));
    let mut seq = sequencer(&bot, config).await;

    let outcome = seq
        .run_test(&test(
            "lost",
            [step([], Response::text("go")), step([], Response::default())],
        ))
        .await;

    // The step response never reached the bot, so the wait runs out.
    let failure = outcome.result.expect_err("test should time out");
    assert_eq!(failure.position, StepPosition::Step(0));
    assert_eq!(
        failure.failure,
        StepFailure::Turn(TurnError::Timeout(Duration::from_secs(1)))
    );
    assert_eq!(bot.received_messages(), vec![text("/start")]);
}

#[tokio::test]
async fn long_reply_arrives_whole() {
    let mut events: Vec<BotEvent> = (0..70).map(|i| BotEvent::text(format!("line {i}"))).collect();
    events.push(BotEvent::InputPrompt);
    let bot = StubBot::new().on_text("/start", events);
    let mut seq = sequencer(&bot, RunConfig::default()).await;

    let outcome = seq
        .run_test(&test(
            "long",
            [step(
                [Assertion::text(0, "line 0"), Assertion::text(69, "line 69")],
                Response::default(),
            )],
        ))
        .await;

    assert_eq!(outcome.result, Ok(()));
}

#[tokio::test]
async fn buttons_sent_after_turn_end_cannot_be_clicked() {
    let bot = StubBot::new()
        .on_text(
            "/start",
            [
                BotEvent::text("hi"),
                BotEvent::InputPrompt,
                BotEvent::buttons("late", vec![Button::new("A", "stale")]),
            ],
        )
        .on_text("go", [BotEvent::InputPrompt]);
    let mut seq = sequencer(&bot, RunConfig::default()).await;

    let outcome = seq
        .run_test(&test(
            "stale",
            [
                step([Assertion::text(0, "hi")], Response::text("go")),
                step([], Response::click(0)),
                step([], Response::default()),
            ],
        ))
        .await;

    let failure = outcome.result.expect_err("click should be rejected");
    assert_eq!(failure.position, StepPosition::Step(1));
    assert!(matches!(
        failure.failure,
        StepFailure::Click(StateError::StaleButtons { offered, requested }) if offered < requested
    ));
    assert_eq!(bot.received_messages(), vec![text("/start"), text("go")]);
}

#[tokio::test]
async fn empty_test_only_starts_the_conversation() {
    let bot = greeter();
    let mut seq = sequencer(&bot, RunConfig::default()).await;

    let outcome = seq.run_test(&test("empty", [])).await;

    assert_eq!(outcome.result, Ok(()));
    assert!(seq.state().is_empty());
}

#[tokio::test]
async fn unknown_assertion_kinds_are_ignored() {
    let bot = greeter();
    let mut seq = sequencer(&bot, RunConfig::default()).await;
    let other = Assertion {
        kind: AssertionKind::Other,
        index: 7,
        value: "whatever".into(),
    };

    let outcome = seq.run_test(&test("other", [step([other], Response::default())])).await;

    assert_eq!(outcome.result, Ok(()));
}
