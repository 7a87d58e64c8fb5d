//! Shared helpers for sequencer integration tests.

use botrunner::{
    ConsoleReporter,
    Dispatcher,
    RunConfig,
    Sequencer,
    Transport,
    event_queue,
};
use botrunner_testing::{StubBot, script::document};

pub type TestSequencer = Sequencer<StubBot, ConsoleReporter<Vec<u8>>>;

/// Subscribe a fresh sequencer to `bot` on the test identity's topic.
pub async fn sequencer(bot: &StubBot, config: RunConfig) -> TestSequencer {
    let doc = document([]);
    let (sink, turns) = event_queue(config.queue_capacity);
    bot.subscribe(&doc.topic(), sink).await.expect("subscribe");
    let dispatcher = Dispatcher::new(bot.clone(), doc.config);
    Sequencer::new(dispatcher, turns, ConsoleReporter::new(Vec::new()), config)
}

/// Everything the sequencer printed so far.
pub fn output(sequencer: &TestSequencer) -> String {
    String::from_utf8_lossy(sequencer.reporter().get_ref()).into_owned()
}
