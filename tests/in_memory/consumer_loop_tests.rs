//! End-to-end tests driving the consumer loop over in-memory adapters.

use std::sync::Arc;

use super::helpers::{Stores, render_compute, stores};
use gantry::{
    consumer::{
        ConsumerLoop, LoopSummary, ShutdownSignal, StreamMessage, adapters::channel::channel,
    },
    task::{domain::TaskStatus, ports::StateStore},
};
use rstest::rstest;

async fn consume(stores: &Stores, messages: Vec<StreamMessage>) -> eyre::Result<LoopSummary> {
    let (sender, source) = channel(messages.len().max(1));
    for message in messages {
        sender.send(message).await?;
    }
    drop(sender);
    let pipeline = Arc::new(stores.pipeline(render_compute()));
    Ok(ConsumerLoop::new(source, pipeline, ShutdownSignal::never())
        .run()
        .await)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn commit_message_completes_its_task(stores: Stores) -> eyre::Result<()> {
    let task_id = stores.seed_processing("T1", "u1")?;

    let summary = consume(&stores, vec![StreamMessage::new("commit", "T1")]).await?;

    eyre::ensure!(summary.succeeded == 1, "unexpected summary {summary:?}");
    let stored = stores.state.get(&task_id).await?;
    eyre::ensure!(stored.status() == TaskStatus::Succeeded, "task not completed");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn non_commit_message_touches_nothing(stores: Stores) -> eyre::Result<()> {
    let task_id = stores.seed_processing("T1", "u1")?;
    let before = stores.state.raw(&task_id);

    let summary = consume(&stores, vec![StreamMessage::new("other", "T1")]).await?;

    eyre::ensure!(summary.skipped == 1, "unexpected summary {summary:?}");
    eyre::ensure!(stores.state.raw(&task_id) == before, "record changed");
    eyre::ensure!(stores.state.write_count() == 0, "unexpected state write");
    eyre::ensure!(stores.artifacts.is_empty(), "unexpected upload");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_runs_do_not_stop_later_messages(stores: Stores) -> eyre::Result<()> {
    let task_id = stores.seed_processing("T3", "u3")?;

    let summary = consume(
        &stores,
        vec![
            StreamMessage::new("commit", "T-missing"),
            StreamMessage::new("commit", "T3"),
        ],
    )
    .await?;

    eyre::ensure!(
        summary
            == LoopSummary {
                received: 2,
                dispatched: 2,
                skipped: 0,
                succeeded: 1,
                failed: 1,
                receive_errors: 0,
            },
        "unexpected summary {summary:?}"
    );
    let stored = stores.state.get(&task_id).await?;
    eyre::ensure!(stored.status() == TaskStatus::Succeeded, "T3 not completed");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn redelivered_commit_overwrites_the_same_artifact(stores: Stores) -> eyre::Result<()> {
    stores.seed_processing("T1", "u1")?;

    let summary = consume(
        &stores,
        vec![
            StreamMessage::new("commit", "T1"),
            StreamMessage::new("commit", "T1"),
        ],
    )
    .await?;

    eyre::ensure!(summary.succeeded == 2, "unexpected summary {summary:?}");
    eyre::ensure!(stores.artifacts.len() == 1, "expected a single object");
    eyre::ensure!(stores.artifacts.put_count() == 2, "expected two uploads");
    Ok(())
}
