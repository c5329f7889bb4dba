//! Server configuration loaded from the environment
//!
//! Kept deliberately small: this server has no database, TLS, or LDAP
//! surface, so unlike the orchestrator's file-based `ServerConfig`, the
//! handful of knobs here are read straight from env vars.

use std::time::Duration;

/// Server-wide configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on a single superstep's wall-clock time (spec 4.F step timeout)
    pub step_timeout: Option<Duration>,
    /// Upper bound on a run's total wall-clock time before it is marked `timeout`
    pub run_timeout: Option<Duration>,
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8123);

        let step_timeout = std::env::var("LANGGRAPH_STEP_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_millis);

        let run_timeout = std::env::var("LANGGRAPH_RUN_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_millis);

        Self {
            host,
            port,
            step_timeout,
            run_timeout,
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8123,
            step_timeout: None,
            run_timeout: None,
        }
    }
}
