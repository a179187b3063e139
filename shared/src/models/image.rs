//! Variant Image Models
//!
//! Variant images form a shared pool: a `VariantImage` row is owned by no
//! single variant and stays alive as long as at least one
//! `VariantImageMap` row references it. Rows that drop to zero references
//! are orphans and are removed by garbage collection.

use serde::{Deserialize, Serialize};

/// Pooled variant image
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct VariantImage {
    pub id: i64,
    pub url: String,
    /// Pool-level display position (order inside an upload batch)
    pub position: i64,
    pub created_at: i64,
}

/// Variant ↔ image mapping with its own per-variant display order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct VariantImageMap {
    pub id: i64,
    pub variant_id: i64,
    pub image_id: i64,
    pub position: i64,
}

/// Image reference in create/update payloads
///
/// Either `id` (reuse a pooled image) or `url` (register a new one, already
/// uploaded to the blob store) must be present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageInput {
    pub id: Option<i64>,
    pub url: Option<String>,
    pub position: Option<i64>,
}
