//! Data models
//!
//! Shared between catalog-server and frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod image;
pub mod option;
pub mod product;
pub mod variant;

// Re-exports
pub use image::*;
pub use option::*;
pub use product::*;
pub use variant::*;
