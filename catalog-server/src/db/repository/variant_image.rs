//! Variant Image Repository
//!
//! 变体图片池 + 引用回收。`variant_image` 行不属于任何单一变体，
//! 生命周期由 `variant_image_map` 的引用数决定：引用数归零即为孤儿，
//! 必须在每次解除映射后调用 [`garbage_collect`] 清理。

use super::{RepoError, RepoResult};
use shared::error::ErrorCode;
use shared::models::{ImageInput, VariantImage};
use sqlx::SqlitePool;
use std::collections::HashSet;

type Tx<'a> = sqlx::Transaction<'a, sqlx::Sqlite>;

/// Insert a new pooled image row, returning its id
pub async fn insert_image(tx: &mut Tx<'_>, url: &str, position: i64) -> RepoResult<i64> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query("INSERT INTO variant_image (id, url, position, created_at) VALUES (?, ?, ?, ?)")
        .bind(id)
        .bind(url)
        .bind(position)
        .bind(now)
        .execute(&mut **tx)
        .await?;
    Ok(id)
}

/// Map an image onto a variant at the given display position
pub async fn map_image(
    tx: &mut Tx<'_>,
    variant_id: i64,
    image_id: i64,
    position: i64,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO variant_image_map (id, variant_id, image_id, position) VALUES (?, ?, ?, ?)",
    )
    .bind(shared::util::snowflake_id())
    .bind(variant_id)
    .bind(image_id)
    .bind(position)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Write an explicit image list onto a variant at sequential positions.
///
/// Inputs carrying an `id` reuse a pooled image; inputs carrying a `url`
/// register a new pool row first. Existing mappings are not touched —
/// callers delete and garbage-collect around this. Returns the number of
/// mappings written.
pub async fn write_images(
    tx: &mut Tx<'_>,
    variant_id: i64,
    inputs: &[ImageInput],
) -> RepoResult<u64> {
    let mut seen: HashSet<i64> = HashSet::new();
    for (idx, input) in inputs.iter().enumerate() {
        let image_id = match (input.id, input.url.as_deref()) {
            (Some(id), _) => {
                let exists = sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM variant_image WHERE id = ?",
                )
                .bind(id)
                .fetch_one(&mut **tx)
                .await?;
                if exists == 0 {
                    return Err(RepoError::not_found(
                        ErrorCode::ImageNotFound,
                        format!("Image {id} not found"),
                    ));
                }
                id
            }
            (None, Some(url)) => {
                insert_image(tx, url, input.position.unwrap_or(idx as i64)).await?
            }
            (None, None) => {
                return Err(RepoError::validation(
                    ErrorCode::InvalidRequest,
                    "Image entry needs id or url",
                ));
            }
        };
        // UNIQUE(variant_id, image_id) would reject the second mapping anyway
        if !seen.insert(image_id) {
            return Err(RepoError::validation(
                ErrorCode::InvalidRequest,
                format!("Image {image_id} listed more than once"),
            ));
        }
        map_image(tx, variant_id, image_id, idx as i64).await?;
    }
    Ok(inputs.len() as u64)
}

/// Image ids mapped to a variant, in display order
pub async fn mapped_image_ids(tx: &mut Tx<'_>, variant_id: i64) -> RepoResult<Vec<i64>> {
    let ids = sqlx::query_scalar::<_, i64>(
        "SELECT image_id FROM variant_image_map WHERE variant_id = ? ORDER BY position",
    )
    .bind(variant_id)
    .fetch_all(&mut **tx)
    .await?;
    Ok(ids)
}

/// Delete all image mappings for a variant. Returns the number removed.
pub async fn delete_maps_for_variant(tx: &mut Tx<'_>, variant_id: i64) -> RepoResult<u64> {
    let result = sqlx::query("DELETE FROM variant_image_map WHERE variant_id = ?")
        .bind(variant_id)
        .execute(&mut **tx)
        .await?;
    Ok(result.rows_affected())
}

/// Delete exactly the candidate images that have zero remaining mappings.
///
/// 必须在替换映射写入 *之后* 调用：先删后查会误杀同一变体换了映射行
/// 但仍在用的图片。Returns the ids actually deleted.
pub async fn garbage_collect(tx: &mut Tx<'_>, candidates: &[i64]) -> RepoResult<Vec<i64>> {
    if candidates.is_empty() {
        return Ok(vec![]);
    }

    // Dynamic IN list — keep as runtime query
    let placeholders = candidates.iter().map(|_| "?").collect::<Vec<_>>().join(",");
    let sql = format!(
        "SELECT DISTINCT image_id FROM variant_image_map WHERE image_id IN ({placeholders})"
    );
    let mut query = sqlx::query_scalar::<_, i64>(&sql);
    for id in candidates {
        query = query.bind(id);
    }
    let referenced: HashSet<i64> = query.fetch_all(&mut **tx).await?.into_iter().collect();

    let orphans: Vec<i64> = candidates
        .iter()
        .copied()
        .collect::<HashSet<_>>()
        .into_iter()
        .filter(|id| !referenced.contains(id))
        .collect();

    if !orphans.is_empty() {
        let placeholders = orphans.iter().map(|_| "?").collect::<Vec<_>>().join(",");
        let sql = format!("DELETE FROM variant_image WHERE id IN ({placeholders})");
        let mut query = sqlx::query(&sql);
        for id in &orphans {
            query = query.bind(id);
        }
        query.execute(&mut **tx).await?;
    }

    Ok(orphans)
}

/// Images for a variant in per-variant display order
pub async fn find_for_variant(pool: &SqlitePool, variant_id: i64) -> RepoResult<Vec<VariantImage>> {
    let images = sqlx::query_as::<_, VariantImage>(
        "SELECT i.id, i.url, i.position, i.created_at
         FROM variant_image_map m
         JOIN variant_image i ON i.id = m.image_id
         WHERE m.variant_id = ?
         ORDER BY m.position",
    )
    .bind(variant_id)
    .fetch_all(pool)
    .await?;
    Ok(images)
}
