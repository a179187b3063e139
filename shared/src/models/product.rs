//! Product Model

use serde::{Deserialize, Serialize};

use super::image::ImageInput;

/// Product lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum ProductStatus {
    Active,
    Inactive,
    Draft,
}

/// Product entity
///
/// `price` and `stock` are only meaningful while `has_variants` is false;
/// the first variant moves both onto the variant rows and nulls them here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub brand_id: Option<i64>,
    pub has_variants: bool,
    /// Price in cents (simple mode only)
    pub price: Option<i64>,
    pub stock: Option<i64>,
    pub status: ProductStatus,
    pub created_at: i64,
    pub updated_at: i64,
    pub created_by: i64,
    pub updated_by: i64,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    /// Derived from `name` when absent
    pub slug: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub brand_id: Option<i64>,
    pub price: Option<i64>,
    pub stock: Option<i64>,
    pub status: Option<ProductStatus>,
    pub images: Option<Vec<ImageInput>>,
}

/// Update product payload
///
/// When `variant_id` is set together with `images`, the image list replaces
/// that variant's image mappings instead of the product-scoped images.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub brand_id: Option<i64>,
    pub price: Option<i64>,
    pub stock: Option<i64>,
    pub status: Option<ProductStatus>,
    pub variant_id: Option<i64>,
    pub images: Option<Vec<ImageInput>>,
}

/// Product-scoped image (simple mode only)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductImage {
    pub id: i64,
    pub product_id: i64,
    pub url: String,
    pub position: i64,
    pub created_at: i64,
}

/// Per-table counts returned by product deletion (for auditability)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductDeleteCounts {
    pub variant_image_maps: u64,
    pub variant_images: u64,
    pub variant_option_values: u64,
    pub variants: u64,
    pub option_values: u64,
    pub options: u64,
    pub product_images: u64,
    pub products: u64,
}

/// Affected-row summary returned by product update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdateReport {
    pub product_updated: bool,
    pub product_images_replaced: u64,
    pub variant_image_maps_replaced: u64,
    pub images_deleted: u64,
}
