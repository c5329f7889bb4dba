//! `langgraph-server` binary
//!
//! Standalone HTTP/SSE server exposing the run/thread lifecycle (spec
//! module I) over a single bundled pass-through graph. A real deployment
//! embeds `langgraph_server::create_router` with its own `GraphRegistry`
//! instead of using this binary directly; it exists so the crate has a
//! runnable entry point, mirroring the orchestrator's own server binary.

use std::sync::Arc;

use langgraph_checkpoint::InMemoryCheckpointSaver;
use langgraph_core::StateGraph;
use langgraph_server::state::{AppState, GraphRegistry, RunRegistry};
use langgraph_server::{create_router, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt().with_env_filter(rust_log).init();

    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = config.port, "starting langgraph-server");

    let graph = Arc::new(build_default_graph()?);

    let state = AppState {
        graphs: GraphRegistry::single("default", graph),
        registry: RunRegistry::new(),
        checkpointer: Arc::new(InMemoryCheckpointSaver::new()),
        step_timeout: config.step_timeout,
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.addr()).await?;
    tracing::info!("listening on {}", config.addr());

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("langgraph-server shut down gracefully");
    Ok(())
}

/// The bundled default graph: a single node that echoes its input state back
/// unchanged. Exists only so the binary has something to run out of the box.
fn build_default_graph() -> langgraph_core::error::Result<langgraph_core::CompiledGraph> {
    let mut graph = StateGraph::new();
    graph.add_node("passthrough", |state: serde_json::Value| {
        Box::pin(async move { Ok(state) })
    });
    graph.add_edge("__start__", "passthrough");
    graph.add_edge("passthrough", "__end__");
    graph.compile()
}

/// Signal for graceful shutdown (Ctrl-C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL-C signal handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received CTRL-C signal, shutting down");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, shutting down");
        }
    }
}
