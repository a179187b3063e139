//! Variant Repository
//!
//! 变体组合引擎：首变体引导、签名唯一性、图片继承、孤儿回收。
//! 每个写操作都在单个事务内完成，要么全部提交要么全部回滚；
//! 唯一的例外是 [`delete_many`]，按规约逐项隔离。

use super::option::{self, ResolvedAttr};
use super::{RepoError, RepoResult, is_unique_violation, variant_image};
use shared::error::ErrorCode;
use shared::models::{
    DeleteVariantsReport, FailedVariantDelete, ImageInput, Variant, VariantAttribute,
    VariantCreate, VariantDetail, VariantUpdate,
};
use sqlx::SqlitePool;
use std::collections::HashSet;

type Tx<'a> = sqlx::Transaction<'a, sqlx::Sqlite>;

// ── reads ──────────────────────────────────────────────────────────────

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Variant> {
    let variant = sqlx::query_as::<_, Variant>("SELECT * FROM variant WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    variant.ok_or_else(|| {
        RepoError::not_found(ErrorCode::VariantNotFound, format!("Variant {id} not found"))
    })
}

/// Variant with its ordered attributes and images
pub async fn find_detail(pool: &SqlitePool, id: i64) -> RepoResult<VariantDetail> {
    let variant = find_by_id(pool, id).await?;
    let attributes = find_attributes(pool, id).await?;
    let images = variant_image::find_for_variant(pool, id).await?;
    Ok(VariantDetail {
        variant,
        attributes,
        images,
    })
}

/// All variants of a product, each with attributes and images
pub async fn list_for_product(pool: &SqlitePool, product_id: i64) -> RepoResult<Vec<VariantDetail>> {
    let variants = sqlx::query_as::<_, Variant>(
        "SELECT * FROM variant WHERE product_id = ? ORDER BY position",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    let mut result = Vec::with_capacity(variants.len());
    for variant in variants {
        let attributes = find_attributes(pool, variant.id).await?;
        let images = variant_image::find_for_variant(pool, variant.id).await?;
        result.push(VariantDetail {
            variant,
            attributes,
            images,
        });
    }
    Ok(result)
}

async fn find_attributes(pool: &SqlitePool, variant_id: i64) -> RepoResult<Vec<VariantAttribute>> {
    let attributes = sqlx::query_as::<_, VariantAttribute>(
        "SELECT o.id AS option_id, o.name AS option_name,
                val.id AS value_id, val.value, m.position
         FROM variant_option_value m
         JOIN product_option_value val ON val.id = m.option_value_id
         JOIN product_option o ON o.id = val.option_id
         WHERE m.variant_id = ?
         ORDER BY m.position",
    )
    .bind(variant_id)
    .fetch_all(pool)
    .await?;
    Ok(attributes)
}

// ── create ─────────────────────────────────────────────────────────────

/// Create a variant, bootstrapping the product into configurable mode if
/// this is its first.
///
/// 流程（单事务）：解析签名 → 查重 → 插入变体行与签名行 → 图片分支
/// （显式 / 首变体迁移 / 判别值继承 / 最近同级兜底）→ 首变体时翻转
/// `has_variants` 并清空商品价格库存。
pub async fn create(
    pool: &SqlitePool,
    product_id: i64,
    data: VariantCreate,
    actor_id: i64,
) -> RepoResult<VariantDetail> {
    if data.price < 0 {
        return Err(RepoError::validation(
            ErrorCode::ProductInvalidPrice,
            "Price must not be negative",
        ));
    }
    if data.stock < 0 {
        return Err(RepoError::validation(
            ErrorCode::ValueOutOfRange,
            "Stock must not be negative",
        ));
    }

    let mut tx = pool.begin().await?;

    let product_exists =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM product WHERE id = ?")
            .bind(product_id)
            .fetch_one(&mut *tx)
            .await?;
    if product_exists == 0 {
        return Err(RepoError::not_found(
            ErrorCode::ProductNotFound,
            format!("Product {product_id} not found"),
        ));
    }

    let existing =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM variant WHERE product_id = ?")
            .bind(product_id)
            .fetch_one(&mut *tx)
            .await?;
    let is_first = existing == 0;

    let resolved =
        option::resolve_for_variant(&mut tx, product_id, is_first, &data.options, actor_id).await?;
    let value_ids: Vec<i64> = resolved.iter().map(|r| r.value_id).collect();
    let sig = shared::util::signature_hash(&value_ids);

    // Advisory pre-check; the UNIQUE(product_id, signature_hash) index is
    // the authoritative guard under concurrency
    let duplicate = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM variant WHERE product_id = ? AND signature_hash = ?",
    )
    .bind(product_id)
    .bind(&sig)
    .fetch_one(&mut *tx)
    .await?;
    if duplicate > 0 {
        return Err(duplicate_variant(product_id));
    }

    let position = match data.position {
        Some(p) => p,
        None => {
            sqlx::query_scalar::<_, i64>(
                "SELECT COALESCE(MAX(position) + 1, 0) FROM variant WHERE product_id = ?",
            )
            .bind(product_id)
            .fetch_one(&mut *tx)
            .await?
        }
    };

    let variant_id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    let status = data.status.unwrap_or_default();

    let insert = sqlx::query(
        "INSERT INTO variant
             (id, product_id, price, stock, status, position, signature_hash,
              created_at, updated_at, created_by, updated_by)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(variant_id)
    .bind(product_id)
    .bind(data.price)
    .bind(data.stock)
    .bind(status)
    .bind(position)
    .bind(&sig)
    .bind(now)
    .bind(now)
    .bind(actor_id)
    .bind(actor_id)
    .execute(&mut *tx)
    .await;
    if let Err(e) = insert {
        if is_unique_violation(&e) {
            return Err(duplicate_variant(product_id));
        }
        return Err(e.into());
    }

    insert_signature_rows(&mut tx, variant_id, &resolved).await?;
    apply_images(
        &mut tx,
        product_id,
        variant_id,
        is_first,
        data.images.as_deref(),
        &resolved,
    )
    .await?;

    if is_first {
        // Bootstrap: one-way transition into configurable mode
        sqlx::query(
            "UPDATE product SET has_variants = 1, price = NULL, stock = NULL,
                                updated_at = ?, updated_by = ?
             WHERE id = ?",
        )
        .bind(now)
        .bind(actor_id)
        .bind(product_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    find_detail(pool, variant_id).await
}

fn duplicate_variant(product_id: i64) -> RepoError {
    RepoError::conflict(
        ErrorCode::DuplicateVariant,
        format!("An identical option combination already exists on product {product_id}"),
    )
}

/// Insert `variant_option_value` rows ordered by the owning option's
/// position, so the stored signature order always reflects option
/// declaration order regardless of client submission order.
async fn insert_signature_rows(
    tx: &mut Tx<'_>,
    variant_id: i64,
    resolved: &[ResolvedAttr],
) -> RepoResult<()> {
    let mut ordered = resolved.to_vec();
    ordered.sort_by_key(|r| r.option_position);

    for (idx, attr) in ordered.iter().enumerate() {
        sqlx::query(
            "INSERT INTO variant_option_value (id, variant_id, option_value_id, position)
             VALUES (?, ?, ?, ?)",
        )
        .bind(shared::util::snowflake_id())
        .bind(variant_id)
        .bind(attr.value_id)
        .bind(idx as i64)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

// ── image branch ───────────────────────────────────────────────────────

/// Resolve the variant's image set. Mutually exclusive branches:
/// explicit list, first-variant migration from product images, copy from
/// the sibling sharing the discriminator value (zero images when none
/// matches), or — only without a discriminator — copy from the most
/// recent sibling.
async fn apply_images(
    tx: &mut Tx<'_>,
    product_id: i64,
    variant_id: i64,
    is_first: bool,
    explicit: Option<&[ImageInput]>,
    resolved: &[ResolvedAttr],
) -> RepoResult<()> {
    if let Some(images) = explicit {
        variant_image::write_images(tx, variant_id, images).await?;
        if is_first {
            // Product images migrate to variant scope exactly once
            sqlx::query("DELETE FROM product_image WHERE product_id = ?")
                .bind(product_id)
                .execute(&mut **tx)
                .await?;
        }
        return Ok(());
    }

    if is_first {
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT url, position FROM product_image WHERE product_id = ? ORDER BY position",
        )
        .bind(product_id)
        .fetch_all(&mut **tx)
        .await?;
        for (idx, (url, position)) in rows.iter().enumerate() {
            let image_id = variant_image::insert_image(tx, url, *position).await?;
            variant_image::map_image(tx, variant_id, image_id, idx as i64).await?;
        }
        sqlx::query("DELETE FROM product_image WHERE product_id = ?")
            .bind(product_id)
            .execute(&mut **tx)
            .await?;
        return Ok(());
    }

    // Inherit from the sibling sharing the discriminator value. Once a
    // discriminator is declared, an unmatched value means no sibling
    // qualifies and the variant starts with zero images (a Blue variant
    // must not ship with Red's photos).
    if let Some(disc) = option::find_discriminator(tx, product_id).await? {
        let my_value = resolved
            .iter()
            .find(|r| r.option_id == disc.id)
            .map(|r| r.value_id);
        if let Some(value_id) = my_value {
            let sibling = sqlx::query_scalar::<_, i64>(
                "SELECT v.id FROM variant v
                 JOIN variant_option_value m ON m.variant_id = v.id
                 WHERE v.product_id = ? AND v.id != ? AND m.option_value_id = ?
                 ORDER BY v.created_at DESC LIMIT 1",
            )
            .bind(product_id)
            .bind(variant_id)
            .bind(value_id)
            .fetch_optional(&mut **tx)
            .await?;
            if let Some(sibling_id) = sibling {
                copy_mappings(tx, sibling_id, variant_id).await?;
            }
        }
        return Ok(());
    }

    // No discriminator declared: most recently created sibling; a product
    // with no other variants leaves this one with zero images
    let sibling = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM variant WHERE product_id = ? AND id != ?
         ORDER BY created_at DESC LIMIT 1",
    )
    .bind(product_id)
    .bind(variant_id)
    .fetch_optional(&mut **tx)
    .await?;
    if let Some(sibling_id) = sibling {
        copy_mappings(tx, sibling_id, variant_id).await?;
    }
    Ok(())
}

/// Share the source variant's images by reference: same image ids, same
/// relative order, no pool rows duplicated.
async fn copy_mappings(tx: &mut Tx<'_>, from_variant: i64, to_variant: i64) -> RepoResult<()> {
    let image_ids = variant_image::mapped_image_ids(tx, from_variant).await?;
    for (idx, image_id) in image_ids.iter().enumerate() {
        variant_image::map_image(tx, to_variant, *image_id, idx as i64).await?;
    }
    Ok(())
}

// ── update ─────────────────────────────────────────────────────────────

/// Apply a partial variant update atomically.
///
/// Image mutation is conditional on whether the signature changed *as a
/// set*: a changed signature invalidates the inherited-image rationale and
/// re-runs the image branch; an unchanged one only rewrites the
/// `variant_option_value` rows and leaves the image mappings untouched.
pub async fn update(
    pool: &SqlitePool,
    variant_id: i64,
    data: VariantUpdate,
    actor_id: i64,
) -> RepoResult<VariantDetail> {
    if let Some(price) = data.price
        && price < 0
    {
        return Err(RepoError::validation(
            ErrorCode::ProductInvalidPrice,
            "Price must not be negative",
        ));
    }
    if let Some(stock) = data.stock
        && stock < 0
    {
        return Err(RepoError::validation(
            ErrorCode::ValueOutOfRange,
            "Stock must not be negative",
        ));
    }

    let variant = find_by_id(pool, variant_id).await?;
    let mut tx = pool.begin().await?;
    let mut sig_changed = false;

    if let Some(options) = &data.options {
        // New options may only be declared at first-variant creation
        let resolved =
            option::resolve_for_variant(&mut tx, variant.product_id, false, options, actor_id)
                .await?;
        let new_ids: Vec<i64> = resolved.iter().map(|r| r.value_id).collect();
        let new_sig = shared::util::signature_hash(&new_ids);

        let duplicate = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM variant
             WHERE product_id = ? AND signature_hash = ? AND id != ?",
        )
        .bind(variant.product_id)
        .bind(&new_sig)
        .bind(variant_id)
        .fetch_one(&mut *tx)
        .await?;
        if duplicate > 0 {
            return Err(duplicate_variant(variant.product_id));
        }

        sig_changed = new_sig != variant.signature_hash;

        sqlx::query("DELETE FROM variant_option_value WHERE variant_id = ?")
            .bind(variant_id)
            .execute(&mut *tx)
            .await?;
        insert_signature_rows(&mut tx, variant_id, &resolved).await?;

        if sig_changed {
            let old_image_ids = variant_image::mapped_image_ids(&mut tx, variant_id).await?;
            variant_image::delete_maps_for_variant(&mut tx, variant_id).await?;
            apply_images(
                &mut tx,
                variant.product_id,
                variant_id,
                false,
                data.images.as_deref(),
                &resolved,
            )
            .await?;

            let update = sqlx::query("UPDATE variant SET signature_hash = ? WHERE id = ?")
                .bind(&new_sig)
                .bind(variant_id)
                .execute(&mut *tx)
                .await;
            if let Err(e) = update {
                if is_unique_violation(&e) {
                    return Err(duplicate_variant(variant.product_id));
                }
                return Err(e.into());
            }

            // GC only after the replacing mappings are in place
            variant_image::garbage_collect(&mut tx, &old_image_ids).await?;
        }
    }

    if let Some(images) = &data.images
        && !sig_changed
    {
        // Explicit images without a signature change: straight replacement
        let old_image_ids = variant_image::mapped_image_ids(&mut tx, variant_id).await?;
        variant_image::delete_maps_for_variant(&mut tx, variant_id).await?;
        variant_image::write_images(&mut tx, variant_id, images).await?;
        variant_image::garbage_collect(&mut tx, &old_image_ids).await?;
    }

    sqlx::query(
        "UPDATE variant SET
             price = COALESCE(?, price),
             stock = COALESCE(?, stock),
             status = COALESCE(?, status),
             position = COALESCE(?, position),
             updated_at = ?,
             updated_by = ?
         WHERE id = ?",
    )
    .bind(data.price)
    .bind(data.stock)
    .bind(data.status)
    .bind(data.position)
    .bind(shared::util::now_millis())
    .bind(actor_id)
    .bind(variant_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    find_detail(pool, variant_id).await
}

// ── delete ─────────────────────────────────────────────────────────────

/// Delete variants one by one, each in its own transaction so a missing
/// id does not abort the rest. Reports deleted ids, per-id failures, the
/// number of images garbage-collected, and option values left without any
/// variant reference (warning only).
pub async fn delete_many(pool: &SqlitePool, ids: &[i64]) -> RepoResult<DeleteVariantsReport> {
    let mut report = DeleteVariantsReport::default();
    let mut touched_value_ids: HashSet<i64> = HashSet::new();

    for &id in ids {
        match delete_one(pool, id).await {
            Ok((value_ids, images_deleted)) => {
                touched_value_ids.extend(value_ids);
                report.images_deleted += images_deleted;
                report.deleted.push(id);
            }
            Err(e) => {
                report.failed.push(FailedVariantDelete {
                    id,
                    reason: shared::error::AppError::from(e).message,
                });
            }
        }
    }

    let candidates: Vec<i64> = touched_value_ids.into_iter().collect();
    report.unused_option_values = option::find_unused_values(pool, &candidates).await?;
    Ok(report)
}

async fn delete_one(pool: &SqlitePool, id: i64) -> RepoResult<(Vec<i64>, u64)> {
    let mut tx = pool.begin().await?;

    let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM variant WHERE id = ?")
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
    if exists == 0 {
        return Err(RepoError::not_found(
            ErrorCode::VariantNotFound,
            format!("Variant {id} not found"),
        ));
    }

    let value_ids = sqlx::query_scalar::<_, i64>(
        "SELECT option_value_id FROM variant_option_value WHERE variant_id = ?",
    )
    .bind(id)
    .fetch_all(&mut *tx)
    .await?;
    let old_image_ids = variant_image::mapped_image_ids(&mut tx, id).await?;

    variant_image::delete_maps_for_variant(&mut tx, id).await?;
    sqlx::query("DELETE FROM variant_option_value WHERE variant_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM variant WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let orphans = variant_image::garbage_collect(&mut tx, &old_image_ids).await?;

    tx.commit().await?;
    Ok((value_ids, orphans.len() as u64))
}
