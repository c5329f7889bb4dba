//! Shared server state: graph registry, thread store, run registry
//!
//! Grounded on the orchestrator's `api/ws/replay.rs` event-history pattern
//! (persisted, monotonically-sequenced events behind a lock) and its
//! `AppState`/`BroadcastState` shape for fan-out to live subscribers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use langgraph_core::CompiledGraph;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::models::{MultitaskStrategy, Run, RunStatus, Thread};

/// One event in a run's resumable SSE feed.
///
/// `id` is the monotonic sequence used for `Last-Event-Id` replay (spec 4.I, 6.2);
/// `event_name` is `mode|ns1|ns2…` joined with `CHECKPOINT_NAMESPACE_SEPARATOR`.
#[derive(Debug, Clone)]
pub struct PersistedEvent {
    pub id: u64,
    pub event_name: String,
    pub data: Value,
}

/// Append-only, persisted event log for a single run plus a live fan-out channel.
///
/// Every emitted event is persisted (not just buffered) so a reconnecting
/// client with `Last-Event-Id: X` gets events strictly after `X`, per spec 4.I.
pub struct RunEventLog {
    persisted: parking_lot::Mutex<Vec<PersistedEvent>>,
    live: broadcast::Sender<PersistedEvent>,
    next_id: AtomicU64,
}

impl RunEventLog {
    pub fn new() -> Self {
        let (live, _) = broadcast::channel(1024);
        Self {
            persisted: parking_lot::Mutex::new(Vec::new()),
            live,
            next_id: AtomicU64::new(0),
        }
    }

    /// Subscribe before reading the snapshot, so nothing published between
    /// the subscribe and the snapshot read is missed.
    pub fn subscribe(&self) -> broadcast::Receiver<PersistedEvent> {
        self.live.subscribe()
    }

    /// Events with id strictly greater than `last_event_id` (`None` = from the start).
    pub fn snapshot_since(&self, last_event_id: Option<u64>) -> Vec<PersistedEvent> {
        let persisted = self.persisted.lock();
        match last_event_id {
            Some(id) => persisted.iter().filter(|e| e.id > id).cloned().collect(),
            None => persisted.clone(),
        }
    }

    pub fn max_id(&self) -> Option<u64> {
        self.persisted.lock().last().map(|e| e.id)
    }

    pub fn publish(&self, event_name: String, data: Value) {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let event = PersistedEvent { id, event_name, data };
        self.persisted.lock().push(event.clone());
        // No subscribers is not an error; the event stays persisted for later joins.
        let _ = self.live.send(event);
    }
}

impl Default for RunEventLog {
    fn default() -> Self {
        Self::new()
    }
}

/// A run's mutable bookkeeping: status, final result, event log, cancel handle.
pub struct RunRecord {
    pub run: parking_lot::Mutex<Run>,
    pub events: Arc<RunEventLog>,
    pub result: parking_lot::Mutex<Option<Value>>,
    pub error: parking_lot::Mutex<Option<String>>,
    /// Handle to the task driving execution, used to deliver cancellation.
    pub task: parking_lot::Mutex<Option<tokio::task::JoinHandle<()>>>,
    pub done: Arc<tokio::sync::Notify>,
}

impl RunRecord {
    pub fn new(run: Run) -> Self {
        Self {
            run: parking_lot::Mutex::new(run),
            events: Arc::new(RunEventLog::new()),
            result: parking_lot::Mutex::new(None),
            error: parking_lot::Mutex::new(None),
            task: parking_lot::Mutex::new(None),
            done: Arc::new(tokio::sync::Notify::new()),
        }
    }

    pub fn status(&self) -> RunStatus {
        self.run.lock().status
    }

    pub fn set_status(&self, status: RunStatus) {
        self.run.lock().status = status;
    }
}

/// In-memory thread + run registry.
///
/// A production deployment would back this with the same checkpointer store
/// used for graph state (spec 6.3); an in-memory map is sufficient here since
/// run/thread bookkeeping is server-local, not part of the engine's own
/// persisted checkpoint layout.
#[derive(Clone)]
pub struct RunRegistry {
    threads: Arc<DashMap<String, Thread>>,
    runs: Arc<DashMap<String, Arc<RunRecord>>>,
    /// Active (non-terminal) run id per thread, for multitask_strategy handling.
    active_by_thread: Arc<DashMap<String, String>>,
}

impl RunRegistry {
    pub fn new() -> Self {
        Self {
            threads: Arc::new(DashMap::new()),
            runs: Arc::new(DashMap::new()),
            active_by_thread: Arc::new(DashMap::new()),
        }
    }

    pub fn create_thread(&self, thread: Thread) {
        self.threads.insert(thread.thread_id.clone(), thread);
    }

    pub fn get_thread(&self, thread_id: &str) -> Option<Thread> {
        self.threads.get(thread_id).map(|t| t.clone())
    }

    pub fn delete_thread(&self, thread_id: &str) -> bool {
        self.active_by_thread.remove(thread_id);
        self.threads.remove(thread_id).is_some()
    }

    pub fn list_threads(&self) -> Vec<Thread> {
        self.threads.iter().map(|e| e.value().clone()).collect()
    }

    /// Active run currently owning `thread_id`, if any.
    pub fn active_run_for_thread(&self, thread_id: &str) -> Option<Arc<RunRecord>> {
        let run_id = self.active_by_thread.get(thread_id)?.clone();
        self.runs.get(&run_id).map(|r| r.clone())
    }

    pub fn register_run(&self, record: Arc<RunRecord>, strategy: MultitaskStrategy) {
        let (run_id, thread_id) = {
            let run = record.run.lock();
            (run.run_id.clone(), run.thread_id.clone())
        };
        self.runs.insert(run_id.clone(), record);
        if !matches!(strategy, MultitaskStrategy::Enqueue) || !self.active_by_thread.contains_key(&thread_id) {
            self.active_by_thread.insert(thread_id, run_id);
        }
    }

    pub fn mark_run_finished(&self, thread_id: &str, run_id: &str) {
        if self.active_by_thread.get(thread_id).map(|v| v.value() == run_id).unwrap_or(false) {
            self.active_by_thread.remove(thread_id);
        }
    }

    pub fn get_run(&self, run_id: &str) -> Option<Arc<RunRecord>> {
        self.runs.get(run_id).map(|r| r.clone())
    }

    pub fn list_runs_for_thread(&self, thread_id: &str) -> Vec<Arc<RunRecord>> {
        self.runs
            .iter()
            .filter(|e| e.run.lock().thread_id == thread_id)
            .map(|e| e.value().clone())
            .collect()
    }

    pub fn delete_run(&self, run_id: &str) -> bool {
        self.runs.remove(run_id).is_some()
    }
}

impl Default for RunRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Named, pre-compiled graphs available to the server (spec's `assistant_id`).
#[derive(Clone)]
pub struct GraphRegistry {
    graphs: Arc<HashMap<String, Arc<CompiledGraph>>>,
    default_id: String,
}

impl GraphRegistry {
    pub fn new(graphs: HashMap<String, Arc<CompiledGraph>>, default_id: impl Into<String>) -> Self {
        Self {
            graphs: Arc::new(graphs),
            default_id: default_id.into(),
        }
    }

    pub fn single(default_id: impl Into<String>, graph: Arc<CompiledGraph>) -> Self {
        let default_id = default_id.into();
        let mut graphs = HashMap::new();
        graphs.insert(default_id.clone(), graph);
        Self::new(graphs, default_id)
    }

    pub fn get(&self, assistant_id: Option<&str>) -> Option<Arc<CompiledGraph>> {
        let id = assistant_id.unwrap_or(&self.default_id);
        self.graphs.get(id).cloned()
    }
}

/// Shared application state, injected into every handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub graphs: GraphRegistry,
    pub registry: RunRegistry,
    pub checkpointer: Arc<dyn langgraph_checkpoint::CheckpointSaver>,
    pub step_timeout: Option<std::time::Duration>,
}
