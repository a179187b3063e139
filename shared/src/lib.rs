//! Shared types for the catalog server
//!
//! Common types used across the server and its clients: domain models,
//! error types, response structures, and utility functions.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};
