//! Variant composition engine integration tests
//!
//! Runs against a real SQLite database in a temp directory, through the
//! repository layer (the same path the HTTP handlers take).

use catalog_server::db::DbService;
use catalog_server::db::repository::{product as product_repo, variant as variant_repo};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    ImageInput, ProductCreate, ProductUpdate, VariantCreate, VariantOptionInput, VariantUpdate,
};
use sqlx::SqlitePool;
use tempfile::TempDir;

const ACTOR: i64 = 7;

async fn setup() -> (TempDir, SqlitePool) {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("catalog.db");
    let db = DbService::new(&db_path.to_string_lossy())
        .await
        .expect("db init");
    (dir, db.pool)
}

fn image(url: &str) -> ImageInput {
    ImageInput {
        id: None,
        url: Some(url.to_string()),
        position: None,
    }
}

fn pooled_image(id: i64) -> ImageInput {
    ImageInput {
        id: Some(id),
        url: None,
        position: None,
    }
}

fn new_pair(option_name: &str, value: &str) -> VariantOptionInput {
    VariantOptionInput {
        option_id: None,
        option_name: Some(option_name.to_string()),
        is_discriminator: None,
        value_id: None,
        value: Some(value.to_string()),
    }
}

fn variant_create(price: i64, options: Vec<VariantOptionInput>) -> VariantCreate {
    VariantCreate {
        price,
        stock: 10,
        status: None,
        position: None,
        options,
        images: None,
    }
}

async fn create_product_with_images(pool: &SqlitePool) -> i64 {
    let product = product_repo::create(
        pool,
        ProductCreate {
            name: "Basic Tee".to_string(),
            slug: None,
            description: None,
            category_id: None,
            brand_id: None,
            price: Some(1999),
            stock: Some(50),
            status: None,
            images: Some(vec![image("/images/front.jpg"), image("/images/back.jpg")]),
        },
        ACTOR,
    )
    .await
    .expect("create product");
    product.id
}

async fn count(pool: &SqlitePool, sql: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(sql)
        .fetch_one(pool)
        .await
        .expect("count query")
}

fn code_of(err: catalog_server::db::repository::RepoError) -> ErrorCode {
    AppError::from(err).code
}

// ── bootstrap ──────────────────────────────────────────────────────────

#[tokio::test]
async fn first_variant_bootstraps_product() {
    let (_dir, pool) = setup().await;
    let product_id = create_product_with_images(&pool).await;

    let v1 = variant_repo::create(
        &pool,
        product_id,
        variant_create(2099, vec![new_pair("Color", "Red"), new_pair("Size", "S")]),
        ACTOR,
    )
    .await
    .expect("create v1");

    let product = product_repo::find_by_id(&pool, product_id).await.unwrap();
    assert!(product.has_variants);
    assert_eq!(product.price, None);
    assert_eq!(product.stock, None);

    // Product images migrated to variant scope
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM product_image").await, 0);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM variant_image").await, 2);
    assert_eq!(v1.images.len(), 2);
    assert_eq!(v1.images[0].url, "/images/front.jpg");
    assert_eq!(v1.images[1].url, "/images/back.jpg");

    // Attributes ordered by option declaration order
    assert_eq!(v1.attributes.len(), 2);
    assert_eq!(v1.attributes[0].option_name, "Color");
    assert_eq!(v1.attributes[1].option_name, "Size");
}

#[tokio::test]
async fn color_option_becomes_discriminator_by_name() {
    let (_dir, pool) = setup().await;
    let product_id = create_product_with_images(&pool).await;

    variant_repo::create(
        &pool,
        product_id,
        variant_create(2099, vec![new_pair("Color", "Red"), new_pair("Size", "S")]),
        ACTOR,
    )
    .await
    .unwrap();

    let flagged = count(
        &pool,
        "SELECT COUNT(*) FROM product_option WHERE is_discriminator = 1",
    )
    .await;
    assert_eq!(flagged, 1);
}

// ── image inheritance ──────────────────────────────────────────────────

#[tokio::test]
async fn same_color_sibling_shares_images_by_reference() {
    let (_dir, pool) = setup().await;
    let product_id = create_product_with_images(&pool).await;

    let v1 = variant_repo::create(
        &pool,
        product_id,
        variant_create(2099, vec![new_pair("Color", "Red"), new_pair("Size", "S")]),
        ACTOR,
    )
    .await
    .unwrap();

    let v2 = variant_repo::create(
        &pool,
        product_id,
        variant_create(2099, vec![new_pair("Color", "Red"), new_pair("Size", "M")]),
        ACTOR,
    )
    .await
    .unwrap();

    // Same image ids, same order, no duplicated pool rows
    let v1_ids: Vec<i64> = v1.images.iter().map(|i| i.id).collect();
    let v2_ids: Vec<i64> = v2.images.iter().map(|i| i.id).collect();
    assert_eq!(v1_ids, v2_ids);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM variant_image").await, 2);
    assert_eq!(
        count(&pool, "SELECT COUNT(*) FROM variant_image_map").await,
        4
    );
}

#[tokio::test]
async fn unmatched_discriminator_value_starts_with_zero_images() {
    let (_dir, pool) = setup().await;
    let product_id = create_product_with_images(&pool).await;

    let v1 = variant_repo::create(
        &pool,
        product_id,
        variant_create(2099, vec![new_pair("Color", "Red"), new_pair("Size", "S")]),
        ACTOR,
    )
    .await
    .unwrap();
    assert_eq!(v1.images.len(), 2);

    // No sibling carries Blue; the new variant must not borrow Red's photos
    let v2 = variant_repo::create(
        &pool,
        product_id,
        variant_create(2099, vec![new_pair("Color", "Blue"), new_pair("Size", "S")]),
        ACTOR,
    )
    .await
    .unwrap();
    assert_eq!(v2.images.len(), 0);

    // Red's images are untouched
    let v1_after = variant_repo::find_detail(&pool, v1.variant.id).await.unwrap();
    assert_eq!(v1_after.images.len(), 2);
}

#[tokio::test]
async fn no_discriminator_falls_back_to_latest_sibling() {
    let (_dir, pool) = setup().await;
    let product_id = create_product_with_images(&pool).await;

    // Neither option name is a color synonym, so no discriminator is set
    let v1 = variant_repo::create(
        &pool,
        product_id,
        variant_create(
            2099,
            vec![new_pair("Material", "Cotton"), new_pair("Size", "S")],
        ),
        ACTOR,
    )
    .await
    .unwrap();

    let v2 = variant_repo::create(
        &pool,
        product_id,
        variant_create(
            2099,
            vec![new_pair("Material", "Linen"), new_pair("Size", "S")],
        ),
        ACTOR,
    )
    .await
    .unwrap();

    let v1_ids: Vec<i64> = v1.images.iter().map(|i| i.id).collect();
    let v2_ids: Vec<i64> = v2.images.iter().map(|i| i.id).collect();
    assert_eq!(v1_ids, v2_ids);
}

#[tokio::test]
async fn explicit_images_override_inheritance() {
    let (_dir, pool) = setup().await;
    let product_id = create_product_with_images(&pool).await;

    let mut data = variant_create(2099, vec![new_pair("Color", "Red"), new_pair("Size", "S")]);
    data.images = Some(vec![image("/images/custom.jpg")]);
    let v1 = variant_repo::create(&pool, product_id, data, ACTOR)
        .await
        .unwrap();

    assert_eq!(v1.images.len(), 1);
    assert_eq!(v1.images[0].url, "/images/custom.jpg");
    // Product images still migrate away on the first variant
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM product_image").await, 0);
}

// ── signature uniqueness ───────────────────────────────────────────────

#[tokio::test]
async fn duplicate_signature_is_rejected() {
    let (_dir, pool) = setup().await;
    let product_id = create_product_with_images(&pool).await;

    variant_repo::create(
        &pool,
        product_id,
        variant_create(2099, vec![new_pair("Color", "Red"), new_pair("Size", "S")]),
        ACTOR,
    )
    .await
    .unwrap();
    let before = count(&pool, "SELECT COUNT(*) FROM variant").await;

    let err = variant_repo::create(
        &pool,
        product_id,
        variant_create(2599, vec![new_pair("Color", "Red"), new_pair("Size", "S")]),
        ACTOR,
    )
    .await
    .unwrap_err();
    assert_eq!(code_of(err), ErrorCode::DuplicateVariant);

    // Nothing written
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM variant").await, before);
}

#[tokio::test]
async fn duplicate_check_ignores_submission_order() {
    let (_dir, pool) = setup().await;
    let product_id = create_product_with_images(&pool).await;

    variant_repo::create(
        &pool,
        product_id,
        variant_create(2099, vec![new_pair("Color", "Red"), new_pair("Size", "S")]),
        ACTOR,
    )
    .await
    .unwrap();

    // Same pairs, reversed order
    let err = variant_repo::create(
        &pool,
        product_id,
        variant_create(2099, vec![new_pair("Size", "S"), new_pair("Color", "Red")]),
        ACTOR,
    )
    .await
    .unwrap_err();
    assert_eq!(code_of(err), ErrorCode::DuplicateVariant);
}

// ── option policy ──────────────────────────────────────────────────────

#[tokio::test]
async fn later_variant_cannot_declare_new_option() {
    let (_dir, pool) = setup().await;
    let product_id = create_product_with_images(&pool).await;

    variant_repo::create(
        &pool,
        product_id,
        variant_create(2099, vec![new_pair("Color", "Red"), new_pair("Size", "S")]),
        ACTOR,
    )
    .await
    .unwrap();

    let err = variant_repo::create(
        &pool,
        product_id,
        variant_create(
            2099,
            vec![
                new_pair("Color", "Red"),
                new_pair("Size", "M"),
                new_pair("Material", "Cotton"),
            ],
        ),
        ACTOR,
    )
    .await
    .unwrap_err();
    assert_eq!(code_of(err), ErrorCode::InvalidOptionRef);
}

#[tokio::test]
async fn later_variant_can_add_new_value_of_existing_option() {
    let (_dir, pool) = setup().await;
    let product_id = create_product_with_images(&pool).await;

    variant_repo::create(
        &pool,
        product_id,
        variant_create(2099, vec![new_pair("Color", "Red"), new_pair("Size", "S")]),
        ACTOR,
    )
    .await
    .unwrap();

    // "XL" did not exist before
    let v2 = variant_repo::create(
        &pool,
        product_id,
        variant_create(2099, vec![new_pair("Color", "Red"), new_pair("Size", "XL")]),
        ACTOR,
    )
    .await
    .unwrap();
    assert_eq!(v2.attributes[1].value, "XL");
}

#[tokio::test]
async fn partial_signature_is_rejected() {
    let (_dir, pool) = setup().await;
    let product_id = create_product_with_images(&pool).await;

    variant_repo::create(
        &pool,
        product_id,
        variant_create(2099, vec![new_pair("Color", "Red"), new_pair("Size", "S")]),
        ACTOR,
    )
    .await
    .unwrap();

    // Only one of the product's two options supplied
    let err = variant_repo::create(
        &pool,
        product_id,
        variant_create(2099, vec![new_pair("Color", "Blue")]),
        ACTOR,
    )
    .await
    .unwrap_err();
    assert_eq!(code_of(err), ErrorCode::IncompleteSignature);
}

// ── update ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn unchanged_signature_update_preserves_images() {
    let (_dir, pool) = setup().await;
    let product_id = create_product_with_images(&pool).await;

    let v1 = variant_repo::create(
        &pool,
        product_id,
        variant_create(2099, vec![new_pair("Color", "Red"), new_pair("Size", "S")]),
        ACTOR,
    )
    .await
    .unwrap();
    let before: Vec<i64> = v1.images.iter().map(|i| i.id).collect();

    // Same signature as a set (string-matched values resolve to the same
    // ids), new price
    let updated = variant_repo::update(
        &pool,
        v1.variant.id,
        VariantUpdate {
            price: Some(2499),
            options: Some(vec![new_pair("Size", "S"), new_pair("Color", "Red")]),
            ..Default::default()
        },
        ACTOR,
    )
    .await
    .unwrap();

    let after: Vec<i64> = updated.images.iter().map(|i| i.id).collect();
    assert_eq!(before, after);
    assert_eq!(updated.variant.price, 2499);
    assert_eq!(updated.variant.signature_hash, v1.variant.signature_hash);
}

#[tokio::test]
async fn changed_signature_update_rejects_collision() {
    let (_dir, pool) = setup().await;
    let product_id = create_product_with_images(&pool).await;

    variant_repo::create(
        &pool,
        product_id,
        variant_create(2099, vec![new_pair("Color", "Red"), new_pair("Size", "S")]),
        ACTOR,
    )
    .await
    .unwrap();
    let v2 = variant_repo::create(
        &pool,
        product_id,
        variant_create(2099, vec![new_pair("Color", "Red"), new_pair("Size", "M")]),
        ACTOR,
    )
    .await
    .unwrap();

    // Moving v2 onto v1's signature must fail
    let err = variant_repo::update(
        &pool,
        v2.variant.id,
        VariantUpdate {
            options: Some(vec![new_pair("Color", "Red"), new_pair("Size", "S")]),
            ..Default::default()
        },
        ACTOR,
    )
    .await
    .unwrap_err();
    assert_eq!(code_of(err), ErrorCode::DuplicateVariant);
}

#[tokio::test]
async fn changed_signature_update_reinherits_and_collects_orphans() {
    let (_dir, pool) = setup().await;
    let product_id = create_product_with_images(&pool).await;

    // v1 Red/S inherits the two product images
    let v1 = variant_repo::create(
        &pool,
        product_id,
        variant_create(2099, vec![new_pair("Color", "Red"), new_pair("Size", "S")]),
        ACTOR,
    )
    .await
    .unwrap();
    let red_front = v1.images[0].id;
    let red_back = v1.images[1].id;

    let mut blue = variant_create(2099, vec![new_pair("Color", "Blue"), new_pair("Size", "M")]);
    blue.images = Some(vec![image("/images/blue.jpg")]);
    let v2 = variant_repo::create(&pool, product_id, blue, ACTOR).await.unwrap();

    // v3 keeps a reference to the first Red image only
    let mut red_m = variant_create(2099, vec![new_pair("Color", "Red"), new_pair("Size", "M")]);
    red_m.images = Some(vec![pooled_image(red_front)]);
    variant_repo::create(&pool, product_id, red_m, ACTOR).await.unwrap();

    // Flipping v1's color re-runs inheritance: mappings now follow the
    // Blue sibling, and the captured old ids are garbage collected
    let updated = variant_repo::update(
        &pool,
        v1.variant.id,
        VariantUpdate {
            options: Some(vec![new_pair("Color", "Blue"), new_pair("Size", "S")]),
            ..Default::default()
        },
        ACTOR,
    )
    .await
    .unwrap();

    let v2_ids: Vec<i64> = v2.images.iter().map(|i| i.id).collect();
    let updated_ids: Vec<i64> = updated.images.iter().map(|i| i.id).collect();
    assert_eq!(updated_ids, v2_ids);

    // red_front survives through v3's mapping, red_back is orphaned
    assert_eq!(
        count(&pool, &format!("SELECT COUNT(*) FROM variant_image WHERE id = {red_front}")).await,
        1
    );
    assert_eq!(
        count(&pool, &format!("SELECT COUNT(*) FROM variant_image WHERE id = {red_back}")).await,
        0
    );
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM variant_image").await, 2);
}

#[tokio::test]
async fn explicit_image_update_replaces_and_collects_orphans() {
    let (_dir, pool) = setup().await;
    let product_id = create_product_with_images(&pool).await;

    let v1 = variant_repo::create(
        &pool,
        product_id,
        variant_create(2099, vec![new_pair("Color", "Red"), new_pair("Size", "S")]),
        ACTOR,
    )
    .await
    .unwrap();

    let updated = variant_repo::update(
        &pool,
        v1.variant.id,
        VariantUpdate {
            images: Some(vec![image("/images/new.jpg")]),
            ..Default::default()
        },
        ACTOR,
    )
    .await
    .unwrap();

    assert_eq!(updated.images.len(), 1);
    assert_eq!(updated.images[0].url, "/images/new.jpg");
    // Old images had no other referents and must be gone
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM variant_image").await, 1);
}

#[tokio::test]
async fn image_update_keeps_images_shared_with_sibling() {
    let (_dir, pool) = setup().await;
    let product_id = create_product_with_images(&pool).await;

    let v1 = variant_repo::create(
        &pool,
        product_id,
        variant_create(2099, vec![new_pair("Color", "Red"), new_pair("Size", "S")]),
        ACTOR,
    )
    .await
    .unwrap();
    let v2 = variant_repo::create(
        &pool,
        product_id,
        variant_create(2099, vec![new_pair("Color", "Red"), new_pair("Size", "M")]),
        ACTOR,
    )
    .await
    .unwrap();
    assert_eq!(v1.images.len(), 2);

    // Replacing v2's images must not delete the pool rows v1 still maps
    variant_repo::update(
        &pool,
        v2.variant.id,
        VariantUpdate {
            images: Some(vec![image("/images/only-m.jpg")]),
            ..Default::default()
        },
        ACTOR,
    )
    .await
    .unwrap();

    let v1_after = variant_repo::find_detail(&pool, v1.variant.id).await.unwrap();
    assert_eq!(v1_after.images.len(), 2);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM variant_image").await, 3);
}

#[tokio::test]
async fn repeated_image_in_list_is_rejected() {
    let (_dir, pool) = setup().await;
    let product_id = create_product_with_images(&pool).await;

    let v1 = variant_repo::create(
        &pool,
        product_id,
        variant_create(2099, vec![new_pair("Color", "Red"), new_pair("Size", "S")]),
        ACTOR,
    )
    .await
    .unwrap();
    let first = v1.images[0].id;

    let err = variant_repo::update(
        &pool,
        v1.variant.id,
        VariantUpdate {
            images: Some(vec![pooled_image(first), pooled_image(first)]),
            ..Default::default()
        },
        ACTOR,
    )
    .await
    .unwrap_err();
    assert_eq!(code_of(err), ErrorCode::InvalidRequest);

    // Rolled back: the variant still maps its original two images
    let v1_after = variant_repo::find_detail(&pool, v1.variant.id).await.unwrap();
    assert_eq!(v1_after.images.len(), 2);
}

// ── deletion ───────────────────────────────────────────────────────────

#[tokio::test]
async fn deleting_variant_spares_shared_images_and_warns_on_unused_values() {
    let (_dir, pool) = setup().await;
    let product_id = create_product_with_images(&pool).await;

    let v1 = variant_repo::create(
        &pool,
        product_id,
        variant_create(2099, vec![new_pair("Color", "Red"), new_pair("Size", "S")]),
        ACTOR,
    )
    .await
    .unwrap();
    variant_repo::create(
        &pool,
        product_id,
        variant_create(2099, vec![new_pair("Color", "Red"), new_pair("Size", "M")]),
        ACTOR,
    )
    .await
    .unwrap();

    let report = variant_repo::delete_many(&pool, &[v1.variant.id]).await.unwrap();
    assert_eq!(report.deleted, vec![v1.variant.id]);
    assert!(report.failed.is_empty());
    // Both images still mapped by the sibling
    assert_eq!(report.images_deleted, 0);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM variant_image").await, 2);

    // "S" lost its only referent, "Red" is still used by the sibling
    let unused: Vec<&str> = report
        .unused_option_values
        .iter()
        .map(|v| v.value.as_str())
        .collect();
    assert_eq!(unused, vec!["S"]);
    // Warned, not deleted
    assert_eq!(
        count(&pool, "SELECT COUNT(*) FROM product_option_value").await,
        3
    );
}

#[tokio::test]
async fn batch_delete_is_per_item_isolated() {
    let (_dir, pool) = setup().await;
    let product_id = create_product_with_images(&pool).await;

    let v1 = variant_repo::create(
        &pool,
        product_id,
        variant_create(2099, vec![new_pair("Color", "Red"), new_pair("Size", "S")]),
        ACTOR,
    )
    .await
    .unwrap();

    let report = variant_repo::delete_many(&pool, &[999_999, v1.variant.id]).await.unwrap();
    assert_eq!(report.deleted, vec![v1.variant.id]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].id, 999_999);
}

#[tokio::test]
async fn product_delete_cascades_with_counts() {
    let (_dir, pool) = setup().await;
    let product_id = create_product_with_images(&pool).await;

    variant_repo::create(
        &pool,
        product_id,
        variant_create(2099, vec![new_pair("Color", "Red"), new_pair("Size", "S")]),
        ACTOR,
    )
    .await
    .unwrap();
    variant_repo::create(
        &pool,
        product_id,
        variant_create(2099, vec![new_pair("Color", "Red"), new_pair("Size", "M")]),
        ACTOR,
    )
    .await
    .unwrap();

    let counts = product_repo::delete(&pool, product_id).await.unwrap();
    assert_eq!(counts.variants, 2);
    assert_eq!(counts.variant_image_maps, 4);
    assert_eq!(counts.variant_images, 2);
    assert_eq!(counts.variant_option_values, 4);
    assert_eq!(counts.options, 2);
    assert_eq!(counts.option_values, 3);
    assert_eq!(counts.product_images, 0);
    assert_eq!(counts.products, 1);

    for table in [
        "product",
        "product_option",
        "product_option_value",
        "variant",
        "variant_option_value",
        "variant_image",
        "variant_image_map",
        "product_image",
    ] {
        assert_eq!(count(&pool, &format!("SELECT COUNT(*) FROM {table}")).await, 0);
    }
}

#[tokio::test]
async fn deleting_simple_product_tolerates_empty_sets() {
    let (_dir, pool) = setup().await;
    let product_id = create_product_with_images(&pool).await;

    let counts = product_repo::delete(&pool, product_id).await.unwrap();
    assert_eq!(counts.variants, 0);
    assert_eq!(counts.product_images, 2);
    assert_eq!(counts.products, 1);
}

// ── product-level rules ────────────────────────────────────────────────

#[tokio::test]
async fn duplicate_slug_is_rejected() {
    let (_dir, pool) = setup().await;
    create_product_with_images(&pool).await;

    let err = product_repo::create(
        &pool,
        ProductCreate {
            name: "Basic Tee".to_string(),
            slug: None,
            description: None,
            category_id: None,
            brand_id: None,
            price: Some(999),
            stock: None,
            status: None,
            images: None,
        },
        ACTOR,
    )
    .await
    .unwrap_err();
    assert_eq!(code_of(err), ErrorCode::SlugExists);
}

#[tokio::test]
async fn price_update_rejected_once_configurable() {
    let (_dir, pool) = setup().await;
    let product_id = create_product_with_images(&pool).await;

    variant_repo::create(
        &pool,
        product_id,
        variant_create(2099, vec![new_pair("Color", "Red"), new_pair("Size", "S")]),
        ACTOR,
    )
    .await
    .unwrap();

    let err = product_repo::update(
        &pool,
        product_id,
        ProductUpdate {
            price: Some(1500),
            ..empty_product_update()
        },
        ACTOR,
    )
    .await
    .unwrap_err();
    assert_eq!(code_of(err), ErrorCode::ProductHasVariants);
}

#[tokio::test]
async fn product_update_can_replace_variant_images() {
    let (_dir, pool) = setup().await;
    let product_id = create_product_with_images(&pool).await;

    let v1 = variant_repo::create(
        &pool,
        product_id,
        variant_create(2099, vec![new_pair("Color", "Red"), new_pair("Size", "S")]),
        ACTOR,
    )
    .await
    .unwrap();

    let report = product_repo::update(
        &pool,
        product_id,
        ProductUpdate {
            variant_id: Some(v1.variant.id),
            images: Some(vec![image("/images/reshot.jpg")]),
            ..empty_product_update()
        },
        ACTOR,
    )
    .await
    .unwrap();

    assert_eq!(report.variant_image_maps_replaced, 1);
    assert_eq!(report.images_deleted, 2);

    let v1_after = variant_repo::find_detail(&pool, v1.variant.id).await.unwrap();
    assert_eq!(v1_after.images.len(), 1);
    assert_eq!(v1_after.images[0].url, "/images/reshot.jpg");
}

fn empty_product_update() -> ProductUpdate {
    ProductUpdate {
        name: None,
        slug: None,
        description: None,
        category_id: None,
        brand_id: None,
        price: None,
        stock: None,
        status: None,
        variant_id: None,
        images: None,
    }
}
