//! Integration tests for the stock ledger.
//!
//! These tests require a running PostgreSQL database reachable via the
//! DATABASE_URL environment variable; `#[sqlx::test]` provisions an
//! isolated database per test and applies `migrations/`.

use ims_backend::error::AppError;
use ims_backend::services::ledger::apply_movement;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

async fn create_product(pool: &PgPool, name: &str, code: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO products (name, code) VALUES ($1, $2) RETURNING id")
        .bind(name)
        .bind(code)
        .fetch_one(pool)
        .await
        .expect("insert product")
}

async fn quantity_for(pool: &PgPool, product_id: i64) -> Option<i64> {
    sqlx::query_scalar("SELECT quantity FROM inventories WHERE product_id = $1")
        .bind(product_id)
        .fetch_optional(pool)
        .await
        .expect("read quantity")
}

#[sqlx::test(migrations = "./migrations")]
async fn inbound_creates_row_on_first_use(pool: PgPool) {
    let product_id = create_product(&pool, "Widget", "W-001").await;

    let inventory = apply_movement(&pool, product_id, 5).await.expect("inbound");
    assert_eq!(inventory.product_id, product_id);
    assert_eq!(inventory.quantity, 5);
    assert_eq!(inventory.warehouse_id, None);
    assert_eq!(quantity_for(&pool, product_id).await, Some(5));
}

#[sqlx::test(migrations = "./migrations")]
async fn outbound_without_row_fails_and_creates_nothing(pool: PgPool) {
    let product_id = create_product(&pool, "Widget", "W-001").await;

    let err = apply_movement(&pool, product_id, -5).await.unwrap_err();
    assert!(matches!(err, AppError::InsufficientStock(_)), "{err:?}");
    assert_eq!(quantity_for(&pool, product_id).await, None);
}

#[sqlx::test(migrations = "./migrations")]
async fn inbound_then_outbound_scenario(pool: PgPool) {
    let product_id = create_product(&pool, "Widget", "W-001").await;

    let inv = apply_movement(&pool, product_id, 10).await.expect("inbound 10");
    assert_eq!(inv.quantity, 10);

    let inv = apply_movement(&pool, product_id, -3).await.expect("outbound 3");
    assert_eq!(inv.quantity, 7);

    // Over-withdrawal fails and leaves the quantity untouched.
    let err = apply_movement(&pool, product_id, -10).await.unwrap_err();
    assert!(matches!(err, AppError::InsufficientStock(_)), "{err:?}");
    assert_eq!(quantity_for(&pool, product_id).await, Some(7));
}

#[sqlx::test(migrations = "./migrations")]
async fn inbound_then_equal_outbound_restores_quantity(pool: PgPool) {
    let product_id = create_product(&pool, "Widget", "W-001").await;
    apply_movement(&pool, product_id, 20).await.expect("seed");

    apply_movement(&pool, product_id, 6).await.expect("inbound");
    apply_movement(&pool, product_id, -6).await.expect("outbound");
    assert_eq!(quantity_for(&pool, product_id).await, Some(20));
}

#[sqlx::test(migrations = "./migrations")]
async fn zero_delta_is_rejected(pool: PgPool) {
    let product_id = create_product(&pool, "Widget", "W-001").await;

    let err = apply_movement(&pool, product_id, 0).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)), "{err:?}");
}

#[sqlx::test(migrations = "./migrations")]
async fn unknown_product_is_rejected(pool: PgPool) {
    let err = apply_movement(&pool, 999_999, 5).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "{err:?}");
}

#[sqlx::test(migrations = "./migrations")]
async fn movement_updates_existing_row_in_place(pool: PgPool) {
    let product_id = create_product(&pool, "Widget", "W-001").await;
    let first = apply_movement(&pool, product_id, 4).await.expect("create");
    let second = apply_movement(&pool, product_id, 3).await.expect("update");

    assert_eq!(first.id, second.id);
    assert_eq!(second.quantity, 7);

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inventories WHERE product_id = $1")
        .bind(product_id)
        .fetch_one(&pool)
        .await
        .expect("count rows");
    assert_eq!(rows, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn concurrent_movements_lose_no_updates(
    pool_opts: PgPoolOptions,
    connect_opts: PgConnectOptions,
) {
    // Enough connections that movements genuinely overlap.
    let pool = pool_opts
        .max_connections(10)
        .connect_with(connect_opts)
        .await
        .expect("connect");
    ims_backend::database::run_migrations(&pool)
        .await
        .expect("migrations");

    let product_id = create_product(&pool, "Widget", "W-001").await;

    const M: i64 = 8;
    apply_movement(&pool, product_id, M).await.expect("seed Q = M");

    let mut tasks = Vec::new();
    for _ in 0..M {
        let pool_in = pool.clone();
        tasks.push(tokio::spawn(async move {
            apply_movement(&pool_in, product_id, 1).await
        }));
        let pool_out = pool.clone();
        tasks.push(tokio::spawn(async move {
            apply_movement(&pool_out, product_id, -1).await
        }));
    }

    for task in tasks {
        let result = task.await.expect("task panicked");
        let inventory = result.expect("movement failed");
        // No committed state is ever negative.
        assert!(inventory.quantity >= 0);
    }

    // Net zero: M inbound(+1) and M outbound(-1) cancel out.
    assert_eq!(quantity_for(&pool, product_id).await, Some(M));
}
