//! Product Repository
//!
//! 商品本体 + 商品级图片（仅简单模式）。商品删除按严格依赖序级联，
//! 返回每张表的删除行数。

use super::{RepoError, RepoResult, is_unique_violation, variant_image};
use shared::error::ErrorCode;
use shared::models::{
    Product, ProductCreate, ProductDeleteCounts, ProductImage, ProductUpdate, ProductUpdateReport,
};
use sqlx::SqlitePool;

type Tx<'a> = sqlx::Transaction<'a, sqlx::Sqlite>;

// ── reads ──────────────────────────────────────────────────────────────

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Product> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM product WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    product.ok_or_else(|| {
        RepoError::not_found(ErrorCode::ProductNotFound, format!("Product {id} not found"))
    })
}

pub async fn find_by_slug(pool: &SqlitePool, slug: &str) -> RepoResult<Product> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM product WHERE slug = ?")
        .bind(slug)
        .fetch_optional(pool)
        .await?;
    product.ok_or_else(|| {
        RepoError::not_found(
            ErrorCode::ProductNotFound,
            format!("Product \"{slug}\" not found"),
        )
    })
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>("SELECT * FROM product ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;
    Ok(products)
}

/// Product-scoped images (simple mode), in display order
pub async fn find_images(pool: &SqlitePool, product_id: i64) -> RepoResult<Vec<ProductImage>> {
    let images = sqlx::query_as::<_, ProductImage>(
        "SELECT * FROM product_image WHERE product_id = ? ORDER BY position",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;
    Ok(images)
}

// ── create ─────────────────────────────────────────────────────────────

pub async fn create(pool: &SqlitePool, data: ProductCreate, actor_id: i64) -> RepoResult<Product> {
    let slug = data
        .slug
        .clone()
        .unwrap_or_else(|| shared::util::slugify(&data.name));
    if slug.is_empty() {
        return Err(RepoError::validation(
            ErrorCode::ValidationFailed,
            "Product slug must not be empty",
        ));
    }
    if let Some(price) = data.price
        && price < 0
    {
        return Err(RepoError::validation(
            ErrorCode::ProductInvalidPrice,
            "Price must not be negative",
        ));
    }

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    let status = data.status.unwrap_or(shared::models::ProductStatus::Draft);

    let mut tx = pool.begin().await?;

    let insert = sqlx::query(
        "INSERT INTO product
             (id, name, slug, description, category_id, brand_id, has_variants,
              price, stock, status, created_at, updated_at, created_by, updated_by)
         VALUES (?, ?, ?, ?, ?, ?, 0, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&slug)
    .bind(&data.description)
    .bind(data.category_id)
    .bind(data.brand_id)
    .bind(data.price)
    .bind(data.stock)
    .bind(status)
    .bind(now)
    .bind(now)
    .bind(actor_id)
    .bind(actor_id)
    .execute(&mut *tx)
    .await;

    if let Err(e) = insert {
        if is_unique_violation(&e) {
            return Err(RepoError::conflict(
                ErrorCode::SlugExists,
                format!("Slug \"{slug}\" already exists"),
            ));
        }
        return Err(e.into());
    }

    if let Some(images) = &data.images {
        for (idx, input) in images.iter().enumerate() {
            let Some(url) = input.url.as_deref() else {
                return Err(RepoError::validation(
                    ErrorCode::InvalidRequest,
                    "Product image entry needs a url",
                ));
            };
            insert_product_image(&mut tx, id, url, input.position.unwrap_or(idx as i64)).await?;
        }
    }

    tx.commit().await?;
    find_by_id(pool, id).await
}

async fn insert_product_image(
    tx: &mut Tx<'_>,
    product_id: i64,
    url: &str,
    position: i64,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO product_image (id, product_id, url, position, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(shared::util::snowflake_id())
    .bind(product_id)
    .bind(url)
    .bind(position)
    .bind(shared::util::now_millis())
    .execute(&mut **tx)
    .await?;
    Ok(())
}

// ── update ─────────────────────────────────────────────────────────────

/// Apply a partial product update.
///
/// `price`/`stock` are rejected once the product has variants (they live on
/// the variant rows from then on). When `variant_id` + `images` are given
/// together, the image list replaces that variant's mappings; a plain
/// `images` list replaces the product-scoped images (simple mode only).
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: ProductUpdate,
    actor_id: i64,
) -> RepoResult<ProductUpdateReport> {
    let product = find_by_id(pool, id).await?;

    if (data.price.is_some() || data.stock.is_some()) && product.has_variants {
        return Err(RepoError::validation(
            ErrorCode::ProductHasVariants,
            "Price and stock live on the variants of a configurable product",
        ));
    }
    if let Some(price) = data.price
        && price < 0
    {
        return Err(RepoError::validation(
            ErrorCode::ProductInvalidPrice,
            "Price must not be negative",
        ));
    }
    if let Some(slug) = &data.slug {
        let taken = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM product WHERE slug = ? AND id != ?",
        )
        .bind(slug)
        .bind(id)
        .fetch_one(pool)
        .await?;
        if taken > 0 {
            return Err(RepoError::conflict(
                ErrorCode::SlugExists,
                format!("Slug \"{slug}\" already exists"),
            ));
        }
    }

    let mut report = ProductUpdateReport::default();
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        "UPDATE product SET
             name = COALESCE(?, name),
             slug = COALESCE(?, slug),
             description = COALESCE(?, description),
             category_id = COALESCE(?, category_id),
             brand_id = COALESCE(?, brand_id),
             price = COALESCE(?, price),
             stock = COALESCE(?, stock),
             status = COALESCE(?, status),
             updated_at = ?,
             updated_by = ?
         WHERE id = ?",
    )
    .bind(&data.name)
    .bind(&data.slug)
    .bind(&data.description)
    .bind(data.category_id)
    .bind(data.brand_id)
    .bind(data.price)
    .bind(data.stock)
    .bind(data.status)
    .bind(shared::util::now_millis())
    .bind(actor_id)
    .bind(id)
    .execute(&mut *tx)
    .await?;
    report.product_updated = result.rows_affected() > 0;

    match (data.variant_id, &data.images) {
        (Some(variant_id), Some(images)) => {
            // Variant-scoped image replacement
            let owned = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM variant WHERE id = ? AND product_id = ?",
            )
            .bind(variant_id)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
            if owned == 0 {
                return Err(RepoError::not_found(
                    ErrorCode::VariantNotFound,
                    format!("Variant {variant_id} not found on product {id}"),
                ));
            }

            let old_ids = variant_image::mapped_image_ids(&mut tx, variant_id).await?;
            variant_image::delete_maps_for_variant(&mut tx, variant_id).await?;
            report.variant_image_maps_replaced =
                variant_image::write_images(&mut tx, variant_id, images).await?;
            let orphans = variant_image::garbage_collect(&mut tx, &old_ids).await?;
            report.images_deleted = orphans.len() as u64;
        }
        (None, Some(images)) => {
            if product.has_variants {
                return Err(RepoError::validation(
                    ErrorCode::InvalidRequest,
                    "Configurable product: supply variant_id alongside images",
                ));
            }
            sqlx::query("DELETE FROM product_image WHERE product_id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            for (idx, input) in images.iter().enumerate() {
                let Some(url) = input.url.as_deref() else {
                    return Err(RepoError::validation(
                        ErrorCode::InvalidRequest,
                        "Product image entry needs a url",
                    ));
                };
                insert_product_image(&mut tx, id, url, input.position.unwrap_or(idx as i64))
                    .await?;
            }
            report.product_images_replaced = images.len() as u64;
        }
        (Some(_), None) => {
            return Err(RepoError::validation(
                ErrorCode::InvalidRequest,
                "variant_id without an image list has no effect",
            ));
        }
        (None, None) => {}
    }

    tx.commit().await?;
    Ok(report)
}

// ── delete ─────────────────────────────────────────────────────────────

fn in_clause(ids: &[i64]) -> String {
    ids.iter().map(|_| "?").collect::<Vec<_>>().join(",")
}

/// Delete a product and everything hanging off it, children before
/// parents. Every intermediate set may be empty. Returns per-table counts.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<ProductDeleteCounts> {
    find_by_id(pool, id).await?;

    let mut counts = ProductDeleteCounts::default();
    let mut tx = pool.begin().await?;

    let variant_ids = sqlx::query_scalar::<_, i64>("SELECT id FROM variant WHERE product_id = ?")
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;
    let option_ids =
        sqlx::query_scalar::<_, i64>("SELECT id FROM product_option WHERE product_id = ?")
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;

    if !variant_ids.is_empty() {
        let placeholders = in_clause(&variant_ids);

        // Candidate images before their mappings go away
        let sql = format!(
            "SELECT DISTINCT image_id FROM variant_image_map WHERE variant_id IN ({placeholders})"
        );
        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for vid in &variant_ids {
            query = query.bind(vid);
        }
        let image_candidates = query.fetch_all(&mut *tx).await?;

        let sql = format!("DELETE FROM variant_image_map WHERE variant_id IN ({placeholders})");
        let mut query = sqlx::query(&sql);
        for vid in &variant_ids {
            query = query.bind(vid);
        }
        counts.variant_image_maps = query.execute(&mut *tx).await?.rows_affected();

        let orphans = variant_image::garbage_collect(&mut tx, &image_candidates).await?;
        counts.variant_images = orphans.len() as u64;

        let sql = format!("DELETE FROM variant_option_value WHERE variant_id IN ({placeholders})");
        let mut query = sqlx::query(&sql);
        for vid in &variant_ids {
            query = query.bind(vid);
        }
        counts.variant_option_values = query.execute(&mut *tx).await?.rows_affected();
    }

    counts.variants = sqlx::query("DELETE FROM variant WHERE product_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if !option_ids.is_empty() {
        let placeholders = in_clause(&option_ids);
        let sql = format!("DELETE FROM product_option_value WHERE option_id IN ({placeholders})");
        let mut query = sqlx::query(&sql);
        for oid in &option_ids {
            query = query.bind(oid);
        }
        counts.option_values = query.execute(&mut *tx).await?.rows_affected();
    }

    counts.options = sqlx::query("DELETE FROM product_option WHERE product_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    counts.product_images = sqlx::query("DELETE FROM product_image WHERE product_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    counts.products = sqlx::query("DELETE FROM product WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;
    Ok(counts)
}
