//! `/runs` and `/threads/{tid}/runs` handlers

use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::handlers::sse::{parse_last_event_id, run_event_stream};
use crate::models::{CancelRequest, CreateRunRequest, Run, RunResult};
use crate::response;
use crate::runs::{cancel_run, start_run, wait_for_completion, NewRun};
use crate::state::AppState;

const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(300);

fn into_new_run(thread_id: String, req: CreateRunRequest) -> NewRun {
    NewRun {
        thread_id,
        input: req.input,
        multitask_strategy: req.multitask_strategy,
        metadata: req.metadata,
        assistant_id: req.assistant_id,
        stream_mode: req.stream_mode,
    }
}

/// POST /runs — stateless run create (implicit, ephemeral thread)
pub async fn create_stateless_run(
    State(state): State<AppState>,
    Json(req): Json<CreateRunRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let thread_id = Uuid::new_v4().to_string();
    let record = start_run(&state, into_new_run(thread_id, req)).await?;
    Ok(response::created(record.run.lock().clone()))
}

/// POST /runs/stream — stateless run create + immediately join its SSE
pub async fn create_stateless_run_stream(
    State(state): State<AppState>,
    Json(req): Json<CreateRunRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let thread_id = Uuid::new_v4().to_string();
    let record = start_run(&state, into_new_run(thread_id, req)).await?;
    Ok(run_event_stream(record, None))
}

/// POST /runs/wait — stateless run create + block for the final value
pub async fn create_stateless_run_wait(
    State(state): State<AppState>,
    Json(req): Json<CreateRunRequest>,
) -> ApiResult<Json<RunResult>> {
    let thread_id = Uuid::new_v4().to_string();
    let record = start_run(&state, into_new_run(thread_id, req)).await?;
    wait_for_completion(&record, DEFAULT_WAIT_TIMEOUT).await;
    Ok(Json(to_run_result(&record)))
}

/// POST /runs/batch — create several stateless runs, return their initial records
pub async fn create_stateless_run_batch(
    State(state): State<AppState>,
    Json(reqs): Json<Vec<CreateRunRequest>>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let mut runs = Vec::with_capacity(reqs.len());
    for req in reqs {
        let thread_id = Uuid::new_v4().to_string();
        let record = start_run(&state, into_new_run(thread_id, req)).await?;
        runs.push(record.run.lock().clone());
    }
    Ok(response::created(runs))
}

/// GET /runs/{run_id}/stream — join an existing run's SSE (honors Last-Event-Id)
pub async fn join_run_stream(
    State(state): State<AppState>,
    Path(run_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<impl axum::response::IntoResponse> {
    let record = state
        .registry
        .get_run(&run_id)
        .ok_or_else(|| ApiError::NotFound(format!("run {run_id}")))?;

    let last_event_id = headers
        .get("last-event-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| parse_last_event_id(Some(v)));

    Ok(run_event_stream(record, last_event_id))
}

/// POST /threads/{tid}/runs — stateful run create
pub async fn create_run(
    State(state): State<AppState>,
    Path(thread_id): Path<String>,
    Json(req): Json<CreateRunRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    state
        .registry
        .get_thread(&thread_id)
        .ok_or_else(|| ApiError::NotFound(format!("thread {thread_id}")))?;

    let record = start_run(&state, into_new_run(thread_id, req)).await?;
    Ok(response::created(record.run.lock().clone()))
}

/// GET /threads/{tid}/runs — list runs for a thread
pub async fn list_runs(
    State(state): State<AppState>,
    Path(thread_id): Path<String>,
) -> Json<Vec<Run>> {
    let runs = state
        .registry
        .list_runs_for_thread(&thread_id)
        .iter()
        .map(|r| r.run.lock().clone())
        .collect();
    Json(runs)
}

/// GET /threads/{tid}/runs/{rid} — get a run
pub async fn get_run(
    State(state): State<AppState>,
    Path((_thread_id, run_id)): Path<(String, String)>,
) -> ApiResult<Json<Run>> {
    state
        .registry
        .get_run(&run_id)
        .map(|r| Json(r.run.lock().clone()))
        .ok_or_else(|| ApiError::NotFound(format!("run {run_id}")))
}

/// DELETE /threads/{tid}/runs/{rid} — delete a run
pub async fn delete_run(
    State(state): State<AppState>,
    Path((_thread_id, run_id)): Path<(String, String)>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let record = state
        .registry
        .get_run(&run_id)
        .ok_or_else(|| ApiError::NotFound(format!("run {run_id}")))?;
    if !record.status().is_terminal() {
        cancel_run(&record, true);
    }
    state.registry.delete_run(&run_id);
    Ok(response::no_content())
}

/// GET /threads/{tid}/runs/{rid}/stream — join SSE for a thread's run
pub async fn join_thread_run_stream(
    State(state): State<AppState>,
    Path((_thread_id, run_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> ApiResult<impl axum::response::IntoResponse> {
    join_run_stream(State(state), Path(run_id), headers).await
}

/// GET /threads/{tid}/runs/{rid}/wait — long-poll final value
pub async fn wait_run(
    State(state): State<AppState>,
    Path((_thread_id, run_id)): Path<(String, String)>,
) -> ApiResult<Json<RunResult>> {
    let record = state
        .registry
        .get_run(&run_id)
        .ok_or_else(|| ApiError::NotFound(format!("run {run_id}")))?;
    wait_for_completion(&record, DEFAULT_WAIT_TIMEOUT).await;
    Ok(Json(to_run_result(&record)))
}

/// POST /threads/{tid}/runs/{rid}/cancel — `{wait, action}` → 202 or 204
pub async fn cancel_run_handler(
    State(state): State<AppState>,
    Path((_thread_id, run_id)): Path<(String, String)>,
    Json(req): Json<CancelRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let record = state
        .registry
        .get_run(&run_id)
        .ok_or_else(|| ApiError::NotFound(format!("run {run_id}")))?;

    cancel_run(&record, true);

    if matches!(req.action, crate::models::CancelAction::Rollback) {
        let thread_id = record.run.lock().thread_id.clone();
        let _ = state.checkpointer.delete_thread(&thread_id).await;
    }

    if req.wait {
        wait_for_completion(&record, DEFAULT_WAIT_TIMEOUT).await;
        Ok(response::no_content().into_response())
    } else {
        Ok(response::accepted(record.run.lock().clone()).into_response())
    }
}

fn to_run_result(record: &std::sync::Arc<crate::state::RunRecord>) -> RunResult {
    let run = record.run.lock().clone();
    RunResult {
        run_id: run.run_id,
        status: run.status,
        values: record.result.lock().clone(),
        error: record.error.lock().clone(),
    }
}
