//! `/threads` handlers

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use langgraph_checkpoint::CheckpointSaver;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{CreateThreadRequest, IfExists, Thread};
use crate::response;
use crate::state::AppState;

pub async fn create_thread(
    State(state): State<AppState>,
    Json(req): Json<CreateThreadRequest>,
) -> ApiResult<Response> {
    let thread_id = req.thread_id.unwrap_or_else(|| Uuid::new_v4().to_string());

    if let Some(existing) = state.registry.get_thread(&thread_id) {
        return match req.if_exists {
            Some(IfExists::DoNothing) | None => Ok(response::ok(existing).into_response()),
            Some(IfExists::Raise) => Err(ApiError::Conflict(format!("thread {thread_id} already exists"))),
        };
    }

    let now = Utc::now();
    let thread = Thread {
        thread_id: thread_id.clone(),
        metadata: req.metadata,
        created_at: now,
        updated_at: now,
    };
    state.registry.create_thread(thread.clone());

    Ok(response::created(thread).into_response())
}

pub async fn list_threads(State(state): State<AppState>) -> Json<Vec<Thread>> {
    Json(state.registry.list_threads())
}

pub async fn get_thread(
    State(state): State<AppState>,
    Path(thread_id): Path<String>,
) -> ApiResult<Json<Thread>> {
    state
        .registry
        .get_thread(&thread_id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("thread {thread_id}")))
}

pub async fn delete_thread(
    State(state): State<AppState>,
    Path(thread_id): Path<String>,
) -> ApiResult<Response> {
    let _ = state.checkpointer.delete_thread(&thread_id).await;
    if state.registry.delete_thread(&thread_id) {
        Ok(response::no_content().into_response())
    } else {
        Err(ApiError::NotFound(format!("thread {thread_id}")))
    }
}
