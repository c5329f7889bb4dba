//! API route definitions (spec 6.2 HTTP/SSE surface)

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete run/thread API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        // Thread management
        .route(
            "/threads",
            post(handlers::create_thread).get(handlers::list_threads),
        )
        .route(
            "/threads/:thread_id",
            get(handlers::get_thread).delete(handlers::delete_thread),
        )
        // Stateless runs
        .route("/runs", post(handlers::create_stateless_run))
        .route("/runs/stream", post(handlers::create_stateless_run_stream))
        .route("/runs/wait", post(handlers::create_stateless_run_wait))
        .route("/runs/batch", post(handlers::create_stateless_run_batch))
        .route("/runs/:run_id/stream", get(handlers::join_run_stream))
        // Stateful (thread-scoped) runs
        .route(
            "/threads/:thread_id/runs",
            post(handlers::create_run).get(handlers::list_runs),
        )
        .route(
            "/threads/:thread_id/runs/:run_id",
            get(handlers::get_run).delete(handlers::delete_run),
        )
        .route(
            "/threads/:thread_id/runs/:run_id/stream",
            get(handlers::join_thread_run_stream),
        )
        .route(
            "/threads/:thread_id/runs/:run_id/wait",
            get(handlers::wait_run),
        )
        .route(
            "/threads/:thread_id/runs/:run_id/cancel",
            post(handlers::cancel_run_handler),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use langgraph_checkpoint::InMemoryCheckpointSaver;
    use langgraph_core::StateGraph;
    use std::sync::Arc;

    fn test_state() -> AppState {
        let mut graph = StateGraph::new();
        graph.add_node("noop", |state: serde_json::Value| {
            Box::pin(async move { Ok(state) })
        });
        graph.add_edge("__start__", "noop");
        graph.add_edge("noop", "__end__");
        let compiled = Arc::new(graph.compile().expect("graph compiles"));

        let _ = ServerConfig::default();
        AppState {
            graphs: crate::state::GraphRegistry::single("default", compiled),
            registry: crate::state::RunRegistry::new(),
            checkpointer: Arc::new(InMemoryCheckpointSaver::new()),
            step_timeout: None,
        }
    }

    #[tokio::test]
    async fn test_router_builds() {
        let _router = create_router(test_state());
    }
}
