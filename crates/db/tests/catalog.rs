//! Integration tests for the catalog, listing and aggregation queries.
//!
//! - Product create / update / toggle, and that none of them move stock
//! - Unique constraint violations on codes, names and locations
//! - Movement listing filters and pagination
//! - Monthly summary and dashboard counters

use chrono::{Duration, Utc};
use sqlx::PgPool;
use stockroom_core::ledger::MovementKind;
use stockroom_core::reporting::{day_bounds, month_bounds};
use stockroom_db::models::category::CreateCategory;
use stockroom_db::models::movement::{CreateMovement, MovementFilter};
use stockroom_db::models::product::{CreateProduct, UpdateProduct};
use stockroom_db::models::user::{CreateUser, UpdateUser};
use stockroom_db::models::warehouse::CreateWarehouse;
use stockroom_db::repositories::{
    CategoryRepo, DashboardRepo, MovementRepo, ProductRepo, UserRepo, WarehouseRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_product(code: &str, min_stock: i32) -> CreateProduct {
    CreateProduct {
        name: format!("Item {code}"),
        code: code.to_string(),
        description: None,
        location: None,
        min_stock: Some(min_stock),
        category_id: None,
        warehouse_id: None,
    }
}

fn empty_update() -> UpdateProduct {
    UpdateProduct {
        name: None,
        code: None,
        description: None,
        location: None,
        min_stock: None,
        category_id: None,
        warehouse_id: None,
        is_active: None,
    }
}

async fn seed_user(pool: &PgPool, username: &str) -> i64 {
    let input = CreateUser {
        username: username.to_string(),
        password_hash: "hash".to_string(),
        role: "supervisor".to_string(),
    };
    UserRepo::create(pool, &input).await.unwrap().id
}

async fn record(pool: &PgPool, product_id: i64, user_id: i64, kind: MovementKind, quantity: i32) {
    let input = CreateMovement {
        kind,
        quantity,
        product_id,
        user_id,
        note: None,
    };
    MovementRepo::record(pool, &input).await.unwrap();
}

fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505") && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn new_product_starts_empty_and_low(pool: PgPool) {
    let product = ProductRepo::create(&pool, &new_product("P-1", 5)).await.unwrap();

    assert_eq!(product.stock, 0);
    assert_eq!(product.min_stock, 5);
    assert!(product.is_active);
    assert!(product.is_low_stock);
}

#[sqlx::test(migrations = "./migrations")]
async fn min_stock_defaults_to_zero(pool: PgPool) {
    let mut input = new_product("P-2", 0);
    input.min_stock = None;
    let product = ProductRepo::create(&pool, &input).await.unwrap();
    assert_eq!(product.min_stock, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn detail_resolves_category_and_warehouse(pool: PgPool) {
    let category = CategoryRepo::create(
        &pool,
        &CreateCategory {
            name: "Fasteners".to_string(),
        },
    )
    .await
    .unwrap();
    let warehouse = WarehouseRepo::create(
        &pool,
        &CreateWarehouse {
            location: "North dock".to_string(),
        },
    )
    .await
    .unwrap();

    let mut input = new_product("BOLT-8", 10);
    input.category_id = Some(category.id);
    input.warehouse_id = Some(warehouse.id);
    let created = ProductRepo::create(&pool, &input).await.unwrap();

    let detail = ProductRepo::find_by_id(&pool, created.id)
        .await
        .unwrap()
        .expect("product should exist");
    assert_eq!(detail.category_name.as_deref(), Some("Fasteners"));
    assert_eq!(detail.warehouse_location.as_deref(), Some("North dock"));
}

#[sqlx::test(migrations = "./migrations")]
async fn update_never_touches_stock(pool: PgPool) {
    let user_id = seed_user(&pool, "editor").await;
    let product = ProductRepo::create(&pool, &new_product("EDIT-1", 2)).await.unwrap();
    record(&pool, product.id, user_id, MovementKind::Entry, 9).await;

    let mut update = empty_update();
    update.name = Some("Renamed".to_string());
    update.min_stock = Some(20);
    let updated = ProductRepo::update(&pool, product.id, &update)
        .await
        .unwrap()
        .expect("product should exist");

    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.code, "EDIT-1");
    assert_eq!(updated.stock, 9);
    assert!(updated.is_low_stock);
}

#[sqlx::test(migrations = "./migrations")]
async fn update_missing_product_returns_none(pool: PgPool) {
    let result = ProductRepo::update(&pool, 424_242, &empty_update()).await.unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn toggle_flips_active_flag(pool: PgPool) {
    let product = ProductRepo::create(&pool, &new_product("TGL-1", 0)).await.unwrap();

    let off = ProductRepo::toggle_active(&pool, product.id).await.unwrap().unwrap();
    assert!(!off.is_active);
    let on = ProductRepo::toggle_active(&pool, product.id).await.unwrap().unwrap();
    assert!(on.is_active);
}

#[sqlx::test(migrations = "./migrations")]
async fn low_stock_list_skips_inactive_and_healthy(pool: PgPool) {
    let user_id = seed_user(&pool, "stocker").await;
    let empty = ProductRepo::create(&pool, &new_product("LOW-1", 3)).await.unwrap();
    let healthy = ProductRepo::create(&pool, &new_product("LOW-2", 3)).await.unwrap();
    let retired = ProductRepo::create(&pool, &new_product("LOW-3", 3)).await.unwrap();
    let at_min = ProductRepo::create(&pool, &new_product("LOW-4", 3)).await.unwrap();

    record(&pool, healthy.id, user_id, MovementKind::Entry, 10).await;
    record(&pool, at_min.id, user_id, MovementKind::Entry, 3).await;
    ProductRepo::toggle_active(&pool, retired.id).await.unwrap();

    let low = ProductRepo::list_low_stock(&pool).await.unwrap();
    let ids: Vec<i64> = low.iter().map(|d| d.product.id).collect();
    assert_eq!(ids, vec![empty.id, at_min.id]);
}

// ---------------------------------------------------------------------------
// Unique constraints
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_product_code_is_rejected(pool: PgPool) {
    ProductRepo::create(&pool, &new_product("DUP-1", 0)).await.unwrap();
    let err = ProductRepo::create(&pool, &new_product("DUP-1", 0))
        .await
        .unwrap_err();
    assert!(is_unique_violation(&err, "uq_products_code"));
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_lookup_names_are_rejected(pool: PgPool) {
    let category = CreateCategory {
        name: "Paint".to_string(),
    };
    CategoryRepo::create(&pool, &category).await.unwrap();
    let err = CategoryRepo::create(&pool, &category).await.unwrap_err();
    assert!(is_unique_violation(&err, "uq_categories_name"));

    let warehouse = CreateWarehouse {
        location: "Aisle 4".to_string(),
    };
    WarehouseRepo::create(&pool, &warehouse).await.unwrap();
    let err = WarehouseRepo::create(&pool, &warehouse).await.unwrap_err();
    assert!(is_unique_violation(&err, "uq_warehouses_location"));
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_username_is_rejected(pool: PgPool) {
    seed_user(&pool, "twin").await;
    let err = UserRepo::create(
        &pool,
        &CreateUser {
            username: "twin".to_string(),
            password_hash: "hash".to_string(),
            role: "operator".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(is_unique_violation(&err, "uq_users_username"));
}

#[sqlx::test(migrations = "./migrations")]
async fn unknown_role_violates_check(pool: PgPool) {
    let user_id = seed_user(&pool, "promoted").await;
    let update = UpdateUser {
        username: None,
        role: Some("overlord".to_string()),
        is_active: None,
    };
    let err = UserRepo::update(&pool, user_id, &update).await.unwrap_err();
    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.constraint(), Some("ck_users_role"));
        }
        other => panic!("expected database error, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Movement listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn list_filters_by_kind_and_product(pool: PgPool) {
    let user_id = seed_user(&pool, "lister").await;
    let a = ProductRepo::create(&pool, &new_product("LST-A", 0)).await.unwrap();
    let b = ProductRepo::create(&pool, &new_product("LST-B", 0)).await.unwrap();

    record(&pool, a.id, user_id, MovementKind::Entry, 10).await;
    record(&pool, a.id, user_id, MovementKind::Exit, 4).await;
    record(&pool, b.id, user_id, MovementKind::Entry, 7).await;

    let all = MovementRepo::list(&pool, &MovementFilter::default()).await.unwrap();
    assert_eq!(all.len(), 3);
    // newest first
    assert_eq!(all[0].product_code, "LST-B");
    assert_eq!(all[0].username, "lister");

    let entries = MovementRepo::list(
        &pool,
        &MovementFilter {
            kind: Some(MovementKind::Entry),
            ..MovementFilter::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|m| m.movement.kind == "entry"));

    let only_a = MovementRepo::list(
        &pool,
        &MovementFilter {
            product_id: Some(a.id),
            ..MovementFilter::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(only_a.len(), 2);
    assert!(only_a.iter().all(|m| m.product_name == "Item LST-A"));
}

#[sqlx::test(migrations = "./migrations")]
async fn list_date_range_is_inclusive(pool: PgPool) {
    let user_id = seed_user(&pool, "ranger").await;
    let product = ProductRepo::create(&pool, &new_product("RNG-1", 0)).await.unwrap();
    record(&pool, product.id, user_id, MovementKind::Entry, 1).await;

    let stored = MovementRepo::list(&pool, &MovementFilter::default()).await.unwrap();
    let stamp = stored[0].movement.created_at;

    let exact = MovementRepo::list(
        &pool,
        &MovementFilter {
            from: Some(stamp),
            to: Some(stamp),
            ..MovementFilter::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(exact.len(), 1);

    let later = MovementRepo::list(
        &pool,
        &MovementFilter {
            from: Some(stamp + Duration::seconds(1)),
            ..MovementFilter::default()
        },
    )
    .await
    .unwrap();
    assert!(later.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn list_paginates(pool: PgPool) {
    let user_id = seed_user(&pool, "pager").await;
    let product = ProductRepo::create(&pool, &new_product("PG-1", 0)).await.unwrap();
    for quantity in 1..=5 {
        record(&pool, product.id, user_id, MovementKind::Entry, quantity).await;
    }

    let page = MovementRepo::list(
        &pool,
        &MovementFilter {
            limit: Some(2),
            offset: Some(1),
            ..MovementFilter::default()
        },
    )
    .await
    .unwrap();

    let quantities: Vec<i32> = page.iter().map(|m| m.movement.quantity).collect();
    assert_eq!(quantities, vec![4, 3]);
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn summary_totals_current_month(pool: PgPool) {
    let user_id = seed_user(&pool, "summer").await;
    let product = ProductRepo::create(&pool, &new_product("SUM-1", 0)).await.unwrap();
    record(&pool, product.id, user_id, MovementKind::Entry, 30).await;
    record(&pool, product.id, user_id, MovementKind::Entry, 5).await;
    record(&pool, product.id, user_id, MovementKind::Exit, 12).await;

    let (from, to) = month_bounds(Utc::now());
    let summary = MovementRepo::summary(&pool, from, to).await.unwrap();

    assert_eq!(summary.total_movements, 3);
    assert_eq!(summary.total_entered, 35);
    assert_eq!(summary.total_exited, 12);
    assert_eq!(summary.entry_count, 2);
    assert_eq!(summary.exit_count, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn summary_of_empty_window_is_zero(pool: PgPool) {
    let (from, to) = month_bounds(Utc::now() - Duration::days(400));
    let summary = MovementRepo::summary(&pool, from, to).await.unwrap();
    assert_eq!(summary.total_movements, 0);
    assert_eq!(summary.total_entered, 0);
    assert_eq!(summary.total_exited, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn dashboard_counts_today(pool: PgPool) {
    let user_id = seed_user(&pool, "dash").await;
    let stocked = ProductRepo::create(&pool, &new_product("DSH-1", 2)).await.unwrap();
    ProductRepo::create(&pool, &new_product("DSH-2", 2)).await.unwrap();
    let retired = ProductRepo::create(&pool, &new_product("DSH-3", 2)).await.unwrap();
    ProductRepo::toggle_active(&pool, retired.id).await.unwrap();

    record(&pool, stocked.id, user_id, MovementKind::Entry, 10).await;
    record(&pool, stocked.id, user_id, MovementKind::Exit, 1).await;
    record(&pool, stocked.id, user_id, MovementKind::Exit, 1).await;

    let (start, end) = day_bounds(Utc::now());
    let stats = DashboardRepo::stats(&pool, start, end).await.unwrap();

    assert_eq!(stats.total_products, 2);
    assert_eq!(stats.low_stock_products, 1);
    assert_eq!(stats.movements_today, 3);
    assert_eq!(stats.entries_today, 1);
    assert_eq!(stats.exits_today, 2);
}
