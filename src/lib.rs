pub mod app;
pub mod config;
pub mod github_client;
pub mod web;

mod error;

// re-export
pub use app::{serve, App, AppState};
pub use error::{Error, Result};
pub use github_client::GithubClient;

use tracing_subscriber::EnvFilter;

/// Tracing setup for local development. Respects `RUST_LOG`.
pub fn init_dbg_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_target(true)
        .init();
}

/// Tracing setup for production: no ANSI escapes so the log collector gets
/// clean lines.
pub fn init_production_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .init();
}
