//! Option / Option Value Repository
//!
//! 选项与选项值按 max+1 单调分配 position，父级存续期间不回收。
//! 新选项只能由首个变体声明（命名策略，见 [`resolve_for_variant`]）；
//! 新选项值则允许任何变体追加。

use super::{RepoError, RepoResult};
use shared::error::ErrorCode;
use shared::models::{OptionWithValues, ProductOption, ProductOptionValue, UnusedOptionValue, VariantOptionInput};
use sqlx::SqlitePool;

type Tx<'a> = sqlx::Transaction<'a, sqlx::Sqlite>;

/// Option names treated as the image-inheritance discriminator by default
/// when a new option is declared without an explicit flag.
const DISCRIMINATOR_SYNONYMS: [&str; 4] = ["màu sắc", "color", "màu", "mau sac"];

/// A resolved (option, value) pair of a variant signature
#[derive(Debug, Clone, Copy)]
pub struct ResolvedAttr {
    pub option_id: i64,
    pub value_id: i64,
    pub option_position: i64,
}

// ── reads ──────────────────────────────────────────────────────────────

/// All options of a product with their ordered values
pub async fn find_for_product(
    pool: &SqlitePool,
    product_id: i64,
) -> RepoResult<Vec<OptionWithValues>> {
    let options = sqlx::query_as::<_, ProductOption>(
        "SELECT * FROM product_option WHERE product_id = ? ORDER BY position",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    let mut result = Vec::with_capacity(options.len());
    for option in options {
        let values = sqlx::query_as::<_, ProductOptionValue>(
            "SELECT * FROM product_option_value WHERE option_id = ? ORDER BY position",
        )
        .bind(option.id)
        .fetch_all(pool)
        .await?;
        result.push(OptionWithValues { option, values });
    }
    Ok(result)
}

/// The product's discriminator option, if one is flagged
pub async fn find_discriminator(
    tx: &mut Tx<'_>,
    product_id: i64,
) -> RepoResult<Option<ProductOption>> {
    let option = sqlx::query_as::<_, ProductOption>(
        "SELECT * FROM product_option WHERE product_id = ? AND is_discriminator = 1 LIMIT 1",
    )
    .bind(product_id)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(option)
}

/// Option count for a product (used to validate signature completeness)
pub async fn count_for_product(tx: &mut Tx<'_>, product_id: i64) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM product_option WHERE product_id = ?",
    )
    .bind(product_id)
    .fetch_one(&mut **tx)
    .await?;
    Ok(count)
}

// ── writes ─────────────────────────────────────────────────────────────

/// Insert a new option at position max+1
pub async fn insert_option(
    tx: &mut Tx<'_>,
    product_id: i64,
    name: &str,
    is_discriminator: bool,
    actor_id: i64,
) -> RepoResult<ProductOption> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    let position = sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(MAX(position) + 1, 0) FROM product_option WHERE product_id = ?",
    )
    .bind(product_id)
    .fetch_one(&mut **tx)
    .await?;

    sqlx::query(
        "INSERT INTO product_option
             (id, product_id, name, position, is_discriminator,
              created_at, updated_at, created_by, updated_by)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(product_id)
    .bind(name)
    .bind(position)
    .bind(is_discriminator)
    .bind(now)
    .bind(now)
    .bind(actor_id)
    .bind(actor_id)
    .execute(&mut **tx)
    .await?;

    Ok(ProductOption {
        id,
        product_id,
        name: name.to_string(),
        position,
        is_discriminator,
        created_at: now,
        updated_at: now,
        created_by: actor_id,
        updated_by: actor_id,
    })
}

/// Insert a new option value at position max+1
pub async fn insert_value(
    tx: &mut Tx<'_>,
    option_id: i64,
    value: &str,
    actor_id: i64,
) -> RepoResult<ProductOptionValue> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    let position = sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(MAX(position) + 1, 0) FROM product_option_value WHERE option_id = ?",
    )
    .bind(option_id)
    .fetch_one(&mut **tx)
    .await?;

    sqlx::query(
        "INSERT INTO product_option_value
             (id, option_id, value, position, created_at, updated_at, created_by, updated_by)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(option_id)
    .bind(value)
    .bind(position)
    .bind(now)
    .bind(now)
    .bind(actor_id)
    .bind(actor_id)
    .execute(&mut **tx)
    .await?;

    Ok(ProductOptionValue {
        id,
        option_id,
        value: value.to_string(),
        position,
        created_at: now,
        updated_at: now,
        created_by: actor_id,
        updated_by: actor_id,
    })
}

// ── signature resolution ───────────────────────────────────────────────

/// Resolve each requested option/value pair into concrete ids, creating
/// options and values as the policy allows.
///
/// Policy:
/// - An existing `option_id` must belong to the product.
/// - `option_name` declares a new option; only the product's first variant
///   may do so (`INVALID_OPTION_REF` otherwise). A name matching an
///   existing option reuses it instead.
/// - `value_id` must belong to the resolved option; `value` reuses an
///   existing value by exact string match or creates a new one (allowed on
///   any variant).
/// - Newly declared options become the discriminator when explicitly
///   flagged, or by name (color synonyms) when the product has none yet.
pub async fn resolve_for_variant(
    tx: &mut Tx<'_>,
    product_id: i64,
    is_first_variant: bool,
    inputs: &[VariantOptionInput],
    actor_id: i64,
) -> RepoResult<Vec<ResolvedAttr>> {
    if inputs.is_empty() {
        return Err(RepoError::validation(
            ErrorCode::IncompleteSignature,
            "A variant must reference at least one option",
        ));
    }

    let mut has_discriminator = find_discriminator(tx, product_id).await?.is_some();
    let mut resolved: Vec<ResolvedAttr> = Vec::with_capacity(inputs.len());

    for input in inputs {
        let option = resolve_option(tx, product_id, is_first_variant, input, &mut has_discriminator, actor_id).await?;

        if resolved.iter().any(|r| r.option_id == option.id) {
            return Err(RepoError::validation(
                ErrorCode::InvalidOptionRef,
                format!("Option {} referenced more than once", option.name),
            ));
        }

        let value = resolve_value(tx, &option, input, actor_id).await?;

        resolved.push(ResolvedAttr {
            option_id: option.id,
            value_id: value.id,
            option_position: option.position,
        });
    }

    // Exactly one value per currently defined option
    let option_count = count_for_product(tx, product_id).await?;
    if resolved.len() as i64 != option_count {
        return Err(RepoError::validation(
            ErrorCode::IncompleteSignature,
            format!(
                "Signature covers {} of {} options",
                resolved.len(),
                option_count
            ),
        ));
    }

    Ok(resolved)
}

async fn resolve_option(
    tx: &mut Tx<'_>,
    product_id: i64,
    is_first_variant: bool,
    input: &VariantOptionInput,
    has_discriminator: &mut bool,
    actor_id: i64,
) -> RepoResult<ProductOption> {
    if let Some(option_id) = input.option_id {
        let option = sqlx::query_as::<_, ProductOption>(
            "SELECT * FROM product_option WHERE id = ? AND product_id = ?",
        )
        .bind(option_id)
        .bind(product_id)
        .fetch_optional(&mut **tx)
        .await?;
        return option.ok_or_else(|| {
            RepoError::validation(
                ErrorCode::InvalidOptionRef,
                format!("Option {option_id} does not belong to product {product_id}"),
            )
        });
    }

    let Some(name) = input.option_name.as_deref() else {
        return Err(RepoError::validation(
            ErrorCode::InvalidOptionRef,
            "Each pair needs option_id or option_name",
        ));
    };

    // Name match reuses the existing option (case-insensitive)
    let existing = sqlx::query_as::<_, ProductOption>(
        "SELECT * FROM product_option WHERE product_id = ? AND LOWER(name) = LOWER(?)",
    )
    .bind(product_id)
    .bind(name)
    .fetch_optional(&mut **tx)
    .await?;
    if let Some(option) = existing {
        return Ok(option);
    }

    if !is_first_variant {
        return Err(RepoError::validation(
            ErrorCode::InvalidOptionRef,
            format!("Option \"{name}\" does not exist; new options may only be declared by the first variant"),
        ));
    }

    let is_discriminator = match input.is_discriminator {
        Some(flag) => flag && !*has_discriminator,
        None => !*has_discriminator && is_discriminator_name(name),
    };
    if is_discriminator {
        *has_discriminator = true;
    }

    insert_option(tx, product_id, name, is_discriminator, actor_id).await
}

async fn resolve_value(
    tx: &mut Tx<'_>,
    option: &ProductOption,
    input: &VariantOptionInput,
    actor_id: i64,
) -> RepoResult<ProductOptionValue> {
    if let Some(value_id) = input.value_id {
        let value = sqlx::query_as::<_, ProductOptionValue>(
            "SELECT * FROM product_option_value WHERE id = ? AND option_id = ?",
        )
        .bind(value_id)
        .bind(option.id)
        .fetch_optional(&mut **tx)
        .await?;
        return value.ok_or_else(|| {
            RepoError::validation(
                ErrorCode::InvalidOptionValueRef,
                format!("Value {value_id} does not belong to option {}", option.name),
            )
        });
    }

    let Some(value_str) = input.value.as_deref() else {
        return Err(RepoError::validation(
            ErrorCode::InvalidOptionValueRef,
            format!("Pair for option {} needs value_id or value", option.name),
        ));
    };

    let existing = sqlx::query_as::<_, ProductOptionValue>(
        "SELECT * FROM product_option_value WHERE option_id = ? AND value = ?",
    )
    .bind(option.id)
    .bind(value_str)
    .fetch_optional(&mut **tx)
    .await?;
    if let Some(value) = existing {
        return Ok(value);
    }

    // New values of an existing option may appear on any variant
    insert_value(tx, option.id, value_str, actor_id).await
}

fn is_discriminator_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    DISCRIMINATOR_SYNONYMS.iter().any(|s| *s == lower)
}

// ── unused-value detection ─────────────────────────────────────────────

/// Among the candidate value ids, those with zero remaining variant
/// references. Warning only — unused values are never auto-deleted.
pub async fn find_unused_values(
    pool: &SqlitePool,
    candidates: &[i64],
) -> RepoResult<Vec<UnusedOptionValue>> {
    if candidates.is_empty() {
        return Ok(vec![]);
    }

    let placeholders = candidates.iter().map(|_| "?").collect::<Vec<_>>().join(",");
    let sql = format!(
        "SELECT v.id, v.option_id, o.name AS option_name, v.value
         FROM product_option_value v
         JOIN product_option o ON o.id = v.option_id
         WHERE v.id IN ({placeholders})
           AND NOT EXISTS (
               SELECT 1 FROM variant_option_value m WHERE m.option_value_id = v.id
           )"
    );
    let mut query = sqlx::query_as::<_, UnusedOptionValue>(&sql);
    for id in candidates {
        query = query.bind(id);
    }
    let unused = query.fetch_all(pool).await?;
    Ok(unused)
}
