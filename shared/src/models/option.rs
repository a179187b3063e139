//! Option / Option Value Models

use serde::{Deserialize, Serialize};

/// Product option (e.g. "Color", "Size")
///
/// `is_discriminator` marks the option whose value drives image inheritance
/// between sibling variants (conventionally the color option).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductOption {
    pub id: i64,
    pub product_id: i64,
    pub name: String,
    pub position: i64,
    pub is_discriminator: bool,
    pub created_at: i64,
    pub updated_at: i64,
    pub created_by: i64,
    pub updated_by: i64,
}

/// A fixed value of an option (e.g. "Red", "XL")
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductOptionValue {
    pub id: i64,
    pub option_id: i64,
    pub value: String,
    pub position: i64,
    pub created_at: i64,
    pub updated_at: i64,
    pub created_by: i64,
    pub updated_by: i64,
}

/// Option with its ordered values (read model)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionWithValues {
    #[serde(flatten)]
    pub option: ProductOption,
    pub values: Vec<ProductOptionValue>,
}

/// An option value that lost its last variant reference.
///
/// Surfaced as a warning on variant deletion; never auto-deleted, the value
/// stays available for future variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct UnusedOptionValue {
    pub id: i64,
    pub option_id: i64,
    pub option_name: String,
    pub value: String,
}
