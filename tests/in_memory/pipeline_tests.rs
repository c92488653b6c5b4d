//! In-memory integration tests for single-task pipeline runs.

use super::helpers::{BASE_URL, Stores, render_compute, stores};
use gantry::{
    artifact::domain::ObjectName,
    compute::adapters::function::FnCompute,
    pipeline::{Outcome, PipelineOptions},
    task::{
        adapters::memory::InMemoryStateStore,
        domain::{TaskRecord, TaskStatus},
        ports::StateStore,
    },
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completed_record_round_trips_through_the_store(stores: Stores) -> eyre::Result<()> {
    let task_id = stores.seed_processing("T1", "gs://inputs/u1.png")?;

    let outcome = stores.pipeline(render_compute()).run(&task_id).await;

    eyre::ensure!(outcome == Outcome::Success, "unexpected outcome {outcome}");
    let stored = stores.state.get(&task_id).await?;
    let raw = stores
        .state
        .raw(&task_id)
        .ok_or_else(|| eyre::eyre!("record missing after run"))?;
    eyre::ensure!(TaskRecord::decode(&raw)? == stored, "stored bytes disagree");
    eyre::ensure!(stored.status() == TaskStatus::Succeeded, "status not updated");
    eyre::ensure!(
        stored.output_locator() == format!("{BASE_URL}/T1_res"),
        "unexpected locator {}",
        stored.output_locator()
    );
    eyre::ensure!(stored.create_time() == 1_700_000_000, "create time changed");
    let artifact = stores
        .artifacts
        .get(&ObjectName::for_task(&task_id))
        .ok_or_else(|| eyre::eyre!("artifact missing"))?;
    eyre::ensure!(
        artifact.bytes() == b"rendered:gs://inputs/u1.png",
        "artifact bytes not produced from input"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stored_payload_keeps_wire_field_order(stores: Stores) -> eyre::Result<()> {
    let task_id = stores.seed_processing("T1", "u1")?;

    let outcome = stores.pipeline(render_compute()).run(&task_id).await;

    eyre::ensure!(outcome == Outcome::Success, "unexpected outcome {outcome}");
    let raw = stores
        .state
        .raw(&task_id)
        .ok_or_else(|| eyre::eyre!("record missing after run"))?;
    let text = String::from_utf8(raw)?;
    eyre::ensure!(
        text == format!(
            r#"{{"task_id":"T1","user_id":"user-1","create_time":1700000000,"proc_status":2,"input_url":"u1","output_url":"{BASE_URL}/T1_res"}}"#
        ),
        "unexpected payload {text}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tasks_are_isolated_from_each_other(stores: Stores) -> eyre::Result<()> {
    let first = stores.seed_processing("T1", "u1")?;
    let second = stores.seed_processing("T2", "u2")?;
    let pipeline = stores.pipeline(render_compute());

    eyre::ensure!(pipeline.run(&first).await == Outcome::Success, "T1 failed");
    let untouched = stores.state.get(&second).await?;
    eyre::ensure!(
        untouched.status() == TaskStatus::Processing,
        "T2 changed by T1's run"
    );
    eyre::ensure!(pipeline.run(&second).await == Outcome::Success, "T2 failed");
    eyre::ensure!(stores.artifacts.len() == 2, "expected two artifacts");
    Ok(())
}

#[rstest]
#[case(PipelineOptions::new(), TaskStatus::Processing)]
#[case(PipelineOptions::new().with_persist_failures(true), TaskStatus::Failed)]
#[tokio::test(flavor = "multi_thread")]
async fn compute_failure_leaves_status_per_options(
    stores: Stores,
    #[case] options: PipelineOptions,
    #[case] expected: TaskStatus,
) -> eyre::Result<()> {
    let task_id = stores.seed_processing("T1", "u1")?;

    let outcome = stores
        .pipeline(FnCompute::failing("inference crashed"))
        .with_options(options)
        .run(&task_id)
        .await;

    eyre::ensure!(outcome == Outcome::ComputeFailure, "unexpected outcome {outcome}");
    let stored = stores.state.get(&task_id).await?;
    eyre::ensure!(stored.status() == expected, "unexpected status {}", stored.status());
    eyre::ensure!(stores.artifacts.is_empty(), "no artifact expected");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn namespaced_store_reads_only_its_namespace(stores: Stores) -> eyre::Result<()> {
    let task_id = stores.seed_processing("T1", "u1")?;
    let other = Stores {
        state: InMemoryStateStore::with_namespace("prod"),
        artifacts: stores.artifacts.clone(),
    };

    let outcome = other.pipeline(render_compute()).run(&task_id).await;

    eyre::ensure!(outcome == Outcome::ReadFailure, "unexpected outcome {outcome}");
    eyre::ensure!(stores.artifacts.is_empty(), "no artifact expected");
    let original = stores.state.get(&task_id).await?;
    eyre::ensure!(
        original.status() == TaskStatus::Processing,
        "default namespace record changed"
    );
    Ok(())
}
