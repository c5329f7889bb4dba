//! HTTP/SSE run server for `langgraph-core` graphs.
//!
//! Implements the run/thread lifecycle and the resumable SSE boundary
//! (spec module I): thread and run CRUD, stateless and stateful run
//! creation, `multitask_strategy` handling for busy threads, and
//! `Last-Event-Id`-based SSE replay backed by a persisted per-run event
//! log.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod response;
pub mod routes;
pub mod runs;
pub mod state;

pub use config::ServerConfig;
pub use routes::create_router;
pub use state::{AppState, GraphRegistry, RunRegistry};
