//! Product API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use http::HeaderMap;
use serde::Serialize;

use crate::api::actor_id;
use crate::core::ServerState;
use crate::db::repository::{option as option_repo, product as product_repo, variant as variant_repo};
use crate::utils::AppResult;
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_SLUG_LEN, MAX_URL_LEN, MAX_VALUE_LEN,
    validate_optional_text, validate_required_text,
};
use shared::models::{
    OptionWithValues, Product, ProductCreate, ProductDeleteCounts, ProductImage, ProductUpdate,
    ProductUpdateReport, VariantCreate, VariantDetail,
};

/// Product with its simple-mode images
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    #[serde(flatten)]
    pub product: Product,
    pub images: Vec<ProductImage>,
}

/// GET /api/products - 获取所有商品
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Product>>> {
    let products = product_repo::find_all(&state.pool).await?;
    Ok(Json(products))
}

/// GET /api/products/:id - 获取单个商品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ProductResponse>> {
    let product = product_repo::find_by_id(&state.pool, id).await?;
    let images = product_repo::find_images(&state.pool, id).await?;
    Ok(Json(ProductResponse { product, images }))
}

/// GET /api/products/slug/:slug - 按 slug 获取商品
pub async fn get_by_slug(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> AppResult<Json<ProductResponse>> {
    let product = product_repo::find_by_slug(&state.pool, &slug).await?;
    let images = product_repo::find_images(&state.pool, product.id).await?;
    Ok(Json(ProductResponse { product, images }))
}

/// POST /api/products - 创建商品（简单模式）
pub async fn create(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(payload.slug.as_deref(), "slug", MAX_SLUG_LEN)?;
    validate_optional_text(payload.description.as_deref(), "description", MAX_DESCRIPTION_LEN)?;
    for img in payload.images.iter().flatten() {
        validate_optional_text(img.url.as_deref(), "image url", MAX_URL_LEN)?;
    }

    let actor = actor_id(&headers);
    let product = product_repo::create(&state.pool, payload, actor).await?;

    tracing::info!(product_id = product.id, slug = %product.slug, "Product created");
    Ok(Json(product))
}

/// PUT /api/products/:id - 更新商品
///
/// `variant_id` + `images` 一起出现时替换该变体的图片映射，
/// 单独的 `images` 替换商品级图片（仅简单模式）。
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<ProductUpdateReport>> {
    validate_optional_text(payload.name.as_deref(), "name", MAX_NAME_LEN)?;
    validate_optional_text(payload.slug.as_deref(), "slug", MAX_SLUG_LEN)?;
    validate_optional_text(payload.description.as_deref(), "description", MAX_DESCRIPTION_LEN)?;
    for img in payload.images.iter().flatten() {
        validate_optional_text(img.url.as_deref(), "image url", MAX_URL_LEN)?;
    }

    let actor = actor_id(&headers);
    let report = product_repo::update(&state.pool, id, payload, actor).await?;
    Ok(Json(report))
}

/// DELETE /api/products/:id - 删除商品（级联，返回每表删除行数）
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ProductDeleteCounts>> {
    let counts = product_repo::delete(&state.pool, id).await?;

    tracing::info!(
        product_id = id,
        variants = counts.variants,
        images = counts.variant_images,
        "Product deleted"
    );
    Ok(Json(counts))
}

/// GET /api/products/:id/images - 商品级图片（简单模式）
pub async fn list_images(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<ProductImage>>> {
    product_repo::find_by_id(&state.pool, id).await?;
    let images = product_repo::find_images(&state.pool, id).await?;
    Ok(Json(images))
}

/// GET /api/products/:id/options - 商品的选项与选项值
pub async fn list_options(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<OptionWithValues>>> {
    product_repo::find_by_id(&state.pool, id).await?;
    let options = option_repo::find_for_product(&state.pool, id).await?;
    Ok(Json(options))
}

/// GET /api/products/:id/variants - 商品的全部变体
pub async fn list_variants(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<VariantDetail>>> {
    product_repo::find_by_id(&state.pool, id).await?;
    let variants = variant_repo::list_for_product(&state.pool, id).await?;
    Ok(Json(variants))
}

/// POST /api/products/:id/variants - 为商品创建变体
///
/// 首个变体触发引导：商品图片迁移为变体图片，价格库存转移到变体行。
pub async fn create_variant(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(payload): Json<VariantCreate>,
) -> AppResult<Json<VariantDetail>> {
    for pair in &payload.options {
        validate_optional_text(pair.option_name.as_deref(), "option_name", MAX_NAME_LEN)?;
        validate_optional_text(pair.value.as_deref(), "value", MAX_VALUE_LEN)?;
    }
    for img in payload.images.iter().flatten() {
        validate_optional_text(img.url.as_deref(), "image url", MAX_URL_LEN)?;
    }

    let actor = actor_id(&headers);
    let detail = variant_repo::create(&state.pool, id, payload, actor).await?;

    tracing::info!(
        product_id = id,
        variant_id = detail.variant.id,
        "Variant created"
    );
    Ok(Json(detail))
}
