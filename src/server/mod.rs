//! HTTP service mode.
//!
//! - `config`: TOML configuration and secrets for `prodscand`
//! - `routes`: the axum router (`/health`, `/version`, `/analyze`)
//! - `error`: mapping of [`ScannerError`](crate::ScannerError) to HTTP
//!   responses

pub mod config;
mod error;
mod routes;

pub use error::ApiError;
pub use routes::{AppState, router};
