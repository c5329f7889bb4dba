//! Request/response models for the run and thread API

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A thread groups a sequence of checkpoints under `thread_id` (spec 3. Data model)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    pub thread_id: String,
    pub metadata: Value,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateThreadRequest {
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub metadata: Value,
    #[serde(default)]
    pub if_exists: Option<IfExists>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IfExists {
    Raise,
    DoNothing,
}

/// How a new run should behave when its target thread already has a run in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MultitaskStrategy {
    /// Reject the new run with 422 while another run owns the thread
    #[default]
    Reject,
    /// Cancel the active run, then enqueue the new one
    Interrupt,
    /// Cancel the active run and delete its checkpoints, then enqueue the new one
    Rollback,
    /// Queue behind the active run
    Enqueue,
}

/// Run lifecycle state (spec 3. Data model)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Pending,
    Running,
    Success,
    Error,
    Interrupted,
    Timeout,
}

impl RunStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunStatus::Success | RunStatus::Error | RunStatus::Interrupted | RunStatus::Timeout
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRunRequest {
    /// Initial state/input handed to the graph
    #[serde(default)]
    pub input: Value,
    #[serde(default)]
    pub metadata: Value,
    #[serde(default)]
    pub multitask_strategy: MultitaskStrategy,
    /// Which registered graph to execute; the registry's default is used if absent
    #[serde(default)]
    pub assistant_id: Option<String>,
    /// Stream modes to enable for this run's SSE feed
    #[serde(default)]
    pub stream_mode: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Run {
    pub run_id: String,
    pub thread_id: String,
    pub status: RunStatus,
    pub multitask_strategy: MultitaskStrategy,
    pub metadata: Value,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CancelAction {
    Interrupt,
    Rollback,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CancelRequest {
    #[serde(default)]
    pub wait: bool,
    #[serde(default = "default_cancel_action")]
    pub action: CancelAction,
}

fn default_cancel_action() -> CancelAction {
    CancelAction::Interrupt
}

/// Final-value response for `join`/`wait` endpoints
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub run_id: String,
    pub status: RunStatus,
    pub values: Option<Value>,
    pub error: Option<String>,
}
