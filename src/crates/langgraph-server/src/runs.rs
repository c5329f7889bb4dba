//! Run execution: spawning a graph invocation and feeding its SSE event log
//!
//! A run is driven by a background tokio task that pulls `StreamChunk`s off
//! `CompiledGraph::stream_chunks_with_modes` and publishes each one into the
//! run's `RunEventLog`, so disconnecting/reconnecting SSE clients replay from
//! persisted history rather than from the live channel alone (spec 4.I).

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use langgraph_core::{CompiledGraph, GraphError, StreamEvent, StreamMode};
use langgraph_checkpoint::{CheckpointConfig, CheckpointSaver};
use serde_json::Value;
use uuid::Uuid;

use crate::models::{MultitaskStrategy, Run, RunStatus};
use crate::state::{AppState, RunRecord};

const NAMESPACE_SEPARATOR: &str = "|";

fn mode_name(mode: StreamMode) -> &'static str {
    match mode {
        StreamMode::Values => "values",
        StreamMode::Updates => "updates",
        StreamMode::Checkpoints => "checkpoints",
        StreamMode::Tasks => "tasks",
        StreamMode::Debug => "debug",
        StreamMode::Messages => "messages",
        StreamMode::Tokens => "tokens",
        StreamMode::Custom => "custom",
    }
}

/// Build the SSE `event:` field: `mode|ns1|ns2…` (spec 6.2).
fn event_name(mode: StreamMode, namespace: &[String]) -> String {
    let mut parts = vec![mode_name(mode).to_string()];
    parts.extend(namespace.iter().cloned());
    parts.join(NAMESPACE_SEPARATOR)
}

fn stream_modes_from_strs(modes: &[String]) -> Vec<StreamMode> {
    let parsed: Vec<StreamMode> = modes
        .iter()
        .filter_map(|m| match m.as_str() {
            "values" => Some(StreamMode::Values),
            "updates" => Some(StreamMode::Updates),
            "checkpoints" => Some(StreamMode::Checkpoints),
            "tasks" => Some(StreamMode::Tasks),
            "debug" => Some(StreamMode::Debug),
            "messages" => Some(StreamMode::Messages),
            "tokens" => Some(StreamMode::Tokens),
            "custom" => Some(StreamMode::Custom),
            _ => None,
        })
        .collect();

    if parsed.is_empty() {
        vec![StreamMode::Values]
    } else {
        parsed
    }
}

pub struct NewRun {
    pub thread_id: String,
    pub input: Value,
    pub multitask_strategy: MultitaskStrategy,
    pub metadata: Value,
    pub assistant_id: Option<String>,
    pub stream_mode: Vec<String>,
}

/// Create a run record, apply multitask_strategy against the thread's active
/// run, register it, and spawn its execution task.
pub async fn start_run(state: &AppState, spec: NewRun) -> Result<Arc<RunRecord>, crate::error::ApiError> {
    use crate::error::ApiError;

    let graph = state
        .graphs
        .get(spec.assistant_id.as_deref())
        .ok_or_else(|| ApiError::NotFound(format!("assistant {:?} not registered", spec.assistant_id)))?;

    if let Some(active) = state.registry.active_run_for_thread(&spec.thread_id) {
        match spec.multitask_strategy {
            MultitaskStrategy::Reject => {
                return Err(ApiError::ThreadBusy(spec.thread_id.clone()));
            }
            MultitaskStrategy::Interrupt => {
                cancel_run(&active, false);
            }
            MultitaskStrategy::Rollback => {
                cancel_run(&active, false);
                let _ = state
                    .checkpointer
                    .delete_thread(&spec.thread_id)
                    .await;
            }
            MultitaskStrategy::Enqueue => {
                // Leave the active run in place; ours starts once registered as active.
            }
        }
    }

    let run_id = Uuid::new_v4().to_string();
    let now = Utc::now();
    let run = Run {
        run_id: run_id.clone(),
        thread_id: spec.thread_id.clone(),
        status: RunStatus::Pending,
        multitask_strategy: spec.multitask_strategy,
        metadata: spec.metadata,
        created_at: now,
        updated_at: now,
    };

    let record = Arc::new(RunRecord::new(run));
    state.registry.register_run(record.clone(), spec.multitask_strategy);

    let modes = stream_modes_from_strs(&spec.stream_mode);
    let handle = tokio::spawn(drive_run(
        state.clone(),
        record.clone(),
        graph,
        spec.input,
        modes,
    ));
    *record.task.lock() = Some(handle);

    Ok(record)
}

/// Request cancellation of an in-flight run. `rollback` additionally drops
/// its checkpoints once the task is confirmed stopped (handled by the caller).
pub fn cancel_run(record: &Arc<RunRecord>, mark_interrupted: bool) {
    if let Some(handle) = record.task.lock().take() {
        handle.abort();
    }
    if mark_interrupted && !record.status().is_terminal() {
        record.set_status(RunStatus::Interrupted);
        record.done.notify_waiters();
    }
}

async fn drive_run(
    state: AppState,
    record: Arc<RunRecord>,
    graph: Arc<CompiledGraph>,
    input: Value,
    modes: Vec<StreamMode>,
) {
    let thread_id = record.run.lock().thread_id.clone();
    record.set_status(RunStatus::Running);

    let config = CheckpointConfig::new().with_thread_id(thread_id.clone());

    let run_future = async {
        let mut stream = graph
            .stream_chunks_with_modes(input, modes, Some(config))
            .await?;

        use futures::StreamExt;
        let mut last_values: Option<Value> = None;
        let mut failure: Option<GraphError> = None;

        while let Some(chunk) = stream.next().await {
            if let StreamEvent::Values { ref state } = chunk.event {
                last_values = Some(state.clone());
            }
            if let StreamEvent::TaskError { ref error, .. } = chunk.event {
                failure = Some(GraphError::Execution(error.clone()));
            }

            let name = event_name(chunk.mode, &chunk.namespace);
            let data = serde_json::to_value(&chunk.event).unwrap_or(Value::Null);
            record.events.publish(name, data);
        }

        if let Some(err) = failure {
            return Err(err);
        }

        Ok(last_values)
    };

    match run_future.await {
        Ok(values) => {
            *record.result.lock() = values.clone();
            record.set_status(RunStatus::Success);
            record.events.publish("end".to_string(), Value::Null);
        }
        Err(GraphError::Timeout { operation, duration_ms }) => {
            *record.error.lock() = Some(format!("timeout in {operation} after {duration_ms}ms"));
            record.set_status(RunStatus::Timeout);
            record.events.publish(
                "error".to_string(),
                serde_json::json!({"message": "step timeout"}),
            );
        }
        Err(e) => {
            *record.error.lock() = Some(e.to_string());
            record.set_status(RunStatus::Error);
            record.events.publish(
                "error".to_string(),
                serde_json::json!({"message": e.to_string()}),
            );
        }
    }

    state.registry.mark_run_finished(&thread_id, &record.run.lock().run_id.clone());
    record.done.notify_waiters();
}

/// Long-poll a run's completion, up to `timeout`.
pub async fn wait_for_completion(record: &Arc<RunRecord>, timeout: Duration) {
    if record.status().is_terminal() {
        return;
    }
    let notified = record.done.notified();
    let _ = tokio::time::timeout(timeout, notified).await;
}
