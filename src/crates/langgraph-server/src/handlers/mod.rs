//! HTTP handlers for the run/thread API

pub mod runs;
pub mod sse;
pub mod threads;

pub use runs::*;
pub use threads::*;
