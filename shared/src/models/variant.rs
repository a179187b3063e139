//! Variant Model

use serde::{Deserialize, Serialize};

use super::image::{ImageInput, VariantImage};
use super::option::UnusedOptionValue;

/// Variant status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum VariantStatus {
    Active,
    Inactive,
}

/// Variant entity — a concrete sellable SKU
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Variant {
    pub id: i64,
    pub product_id: i64,
    /// Price in cents
    pub price: i64,
    pub stock: i64,
    pub status: VariantStatus,
    pub position: i64,
    /// Canonical hash over the sorted option-value id set; unique per product
    pub signature_hash: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub created_by: i64,
    pub updated_by: i64,
}

/// One option/value pair in a variant payload
///
/// Each side is either an existing id or a "create new" instruction:
/// - `option_id` references an existing option; `option_name` declares a new
///   one (only the product's first variant may declare new options).
/// - `value_id` references an existing value of that option; `value` reuses
///   an existing value by string match or creates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantOptionInput {
    pub option_id: Option<i64>,
    pub option_name: Option<String>,
    /// Marks a newly declared option as the image-inheritance discriminator
    pub is_discriminator: Option<bool>,
    pub value_id: Option<i64>,
    pub value: Option<String>,
}

/// Create variant payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantCreate {
    pub price: i64,
    pub stock: i64,
    pub status: Option<VariantStatus>,
    pub position: Option<i64>,
    pub options: Vec<VariantOptionInput>,
    /// Explicit image list; when absent images are inherited (product images
    /// for the first variant, discriminator-matched sibling otherwise)
    pub images: Option<Vec<ImageInput>>,
}

/// Update variant payload (partial)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VariantUpdate {
    pub price: Option<i64>,
    pub stock: Option<i64>,
    pub status: Option<VariantStatus>,
    pub position: Option<i64>,
    /// Full replacement signature; image mutation is conditional on whether
    /// the signature actually changed as a set
    pub options: Option<Vec<VariantOptionInput>>,
    pub images: Option<Vec<ImageInput>>,
}

/// One resolved attribute of a variant, ordered by option position
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct VariantAttribute {
    pub option_id: i64,
    pub option_name: String,
    pub value_id: i64,
    pub value: String,
    pub position: i64,
}

/// Variant with resolved attributes and ordered images
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantDetail {
    #[serde(flatten)]
    pub variant: Variant,
    pub attributes: Vec<VariantAttribute>,
    pub images: Vec<VariantImage>,
}

/// A variant id that could not be deleted, with the reason
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedVariantDelete {
    pub id: i64,
    pub reason: String,
}

/// Result of a multi-variant delete
///
/// Deletion is per-item isolated: one missing variant does not abort the
/// rest. `unused_option_values` lists values that lost their last reference
/// as a side effect (warning only, nothing is deleted).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteVariantsReport {
    pub deleted: Vec<i64>,
    pub failed: Vec<FailedVariantDelete>,
    pub images_deleted: u64,
    pub unused_option_values: Vec<UnusedOptionValue>,
}

impl Default for VariantStatus {
    fn default() -> Self {
        Self::Active
    }
}
