//! HTTP API for the quote and project pipeline.

pub mod routes;
pub mod types;

pub use routes::{serve, AppState};
