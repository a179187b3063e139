//! Variant API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use http::HeaderMap;
use serde::Deserialize;

use crate::api::actor_id;
use crate::core::ServerState;
use crate::db::repository::{variant as variant_repo, variant_image};
use crate::utils::AppResult;
use shared::models::{DeleteVariantsReport, VariantDetail, VariantImage, VariantUpdate};

/// GET /api/variants/:id - 变体详情（含属性与图片）
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<VariantDetail>> {
    let detail = variant_repo::find_detail(&state.pool, id).await?;
    Ok(Json(detail))
}

/// PUT /api/variants/:id - 更新变体
///
/// 仅当签名作为集合发生变化时才触发图片重建；
/// 不变的签名 + 显式图片列表走直接替换。
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(payload): Json<VariantUpdate>,
) -> AppResult<Json<VariantDetail>> {
    let actor = actor_id(&headers);
    let detail = variant_repo::update(&state.pool, id, payload, actor).await?;
    Ok(Json(detail))
}

/// DELETE /api/variants/:id - 删除单个变体
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DeleteVariantsReport>> {
    let report = variant_repo::delete_many(&state.pool, &[id]).await?;
    Ok(Json(report))
}

/// Payload for batch variant deletion
#[derive(Debug, Deserialize)]
pub struct DeleteVariantsRequest {
    pub ids: Vec<i64>,
}

/// DELETE /api/variants - 批量删除变体（逐项隔离）
pub async fn delete_batch(
    State(state): State<ServerState>,
    Json(payload): Json<DeleteVariantsRequest>,
) -> AppResult<Json<DeleteVariantsReport>> {
    let report = variant_repo::delete_many(&state.pool, &payload.ids).await?;

    tracing::info!(
        deleted = report.deleted.len(),
        failed = report.failed.len(),
        images_deleted = report.images_deleted,
        "Variants deleted"
    );
    Ok(Json(report))
}

/// GET /api/variants/:id/images - 变体图片（按映射顺序）
pub async fn list_images(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<VariantImage>>> {
    variant_repo::find_by_id(&state.pool, id).await?;
    let images = variant_image::find_for_variant(&state.pool, id).await?;
    Ok(Json(images))
}
