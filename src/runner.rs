//! End-to-end execution of a script document over a transport.

use tracing::{info, warn};

use crate::{
    config::RunConfig,
    dispatch::Dispatcher,
    error::RunnerError,
    receiver::event_queue,
    report::Reporter,
    script::ScriptDocument,
    sequencer::{Sequencer, SuiteReport},
    transport::Transport,
};

/// Subscribe to the document's conversation topic, run every test and
/// unsubscribe after a fully successful suite.
///
/// Unsubscribe failures are logged and do not affect the report. After a
/// failed suite the subscription is left in place.
///
/// # Errors
///
/// Returns [`RunnerError::Subscribe`] if the subscription cannot be made.
pub async fn run<T, R>(
    document: &ScriptDocument,
    transport: T,
    reporter: R,
    config: RunConfig,
) -> Result<SuiteReport, RunnerError>
where
    T: Transport + Clone,
    R: Reporter,
{
    let topic = document.topic();
    let (sink, turns) = event_queue(config.queue_capacity);
    transport
        .subscribe(&topic, sink)
        .await
        .map_err(|source| RunnerError::Subscribe {
            topic: topic.clone(),
            source,
        })?;
    info!(%topic, "subscribed to conversation");

    let dispatcher = Dispatcher::new(transport.clone(), document.config.clone());
    let mut sequencer = Sequencer::new(dispatcher, turns, reporter, config);
    let report = sequencer.run_suite(&document.tests).await;

    if report.all_passed() {
        if let Err(error) = transport.unsubscribe(&topic).await {
            warn!(%topic, %error, "failed to unsubscribe");
        }
    }
    Ok(report)
}
