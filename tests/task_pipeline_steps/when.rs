//! When steps for task pipeline BDD scenarios.

use std::sync::Arc;

use super::world::{PipelineWorld, run_async};
use gantry::consumer::{
    ConsumerLoop, ShutdownSignal, StreamMessage, adapters::channel::channel,
};
use rstest_bdd_macros::when;

#[when(r#"the stream delivers key "{key}" with value "{value}""#)]
fn stream_delivers(
    world: &mut PipelineWorld,
    key: String,
    value: String,
) -> Result<(), eyre::Report> {
    let (sender, source) = channel(1);
    sender
        .try_send(StreamMessage::new(key, value))
        .map_err(|err| eyre::eyre!("queue scenario message: {err}"))?;
    drop(sender);
    let consumer = ConsumerLoop::new(source, Arc::clone(&world.runner), ShutdownSignal::never());
    world.last_summary = Some(run_async(consumer.run()));
    Ok(())
}
