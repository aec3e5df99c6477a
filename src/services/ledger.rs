//! Stock ledger: applies signed quantity movements to a product's inventory
//! row while keeping `quantity >= 0` on every committed state.
//!
//! Each movement runs as one transaction that locks the product row first,
//! so concurrent movements on the same product queue instead of racing the
//! read-validate-write sequence (no lost updates, no negative intermediate
//! states). Deadlock or serialization aborts retry with a fresh transaction.

use sqlx::PgPool;

use crate::error::AppError;
use crate::models::inventory::Inventory;

const MAX_ATTEMPTS: u32 = 3;

/// Applies a signed movement to the product's stock. Positive `delta` is
/// inbound, negative is outbound. Returns the committed inventory row.
///
/// Fails with `NotFound` for an unknown product, `ValidationError` for a
/// zero delta and `InsufficientStock` when the movement would drive the
/// quantity negative; on failure no write is committed.
pub async fn apply_movement(
    pool: &PgPool,
    product_id: i64,
    delta: i64,
) -> Result<Inventory, AppError> {
    if delta == 0 {
        return Err(AppError::validation("Movement quantity cannot be 0"));
    }

    let mut attempt = 0;
    loop {
        attempt += 1;
        match try_apply(pool, product_id, delta).await {
            Err(AppError::DatabaseError(e)) if is_retryable(&e) => {
                if attempt >= MAX_ATTEMPTS {
                    tracing::warn!(product_id, attempt, "Movement retries exhausted");
                    return Err(AppError::ConflictRetryExhausted);
                }
                tracing::warn!(product_id, attempt, "Movement conflicted, retrying");
            }
            other => return other,
        }
    }
}

fn is_retryable(err: &sqlx::Error) -> bool {
    // 40001 serialization_failure, 40P01 deadlock_detected
    matches!(
        err,
        sqlx::Error::Database(db_err)
            if matches!(db_err.code().as_deref(), Some("40001") | Some("40P01"))
    )
}

async fn try_apply(pool: &PgPool, product_id: i64, delta: i64) -> Result<Inventory, AppError> {
    let mut tx = pool.begin().await?;

    // Locking the product row serializes every movement for this product,
    // including creation of the first inventory row. Also the existence check.
    let product_exists: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM products WHERE id = $1 FOR UPDATE")
            .bind(product_id)
            .fetch_optional(&mut *tx)
            .await?;
    if product_exists.is_none() {
        return Err(AppError::not_found("Product not found"));
    }

    // Single-row-per-product assumption; ORDER BY id makes the pick
    // deterministic if legacy data ever holds several rows.
    let existing = sqlx::query_as::<_, Inventory>(
        "SELECT id, product_id, quantity, warehouse_id
         FROM inventories WHERE product_id = $1
         ORDER BY id LIMIT 1",
    )
    .bind(product_id)
    .fetch_optional(&mut *tx)
    .await?;

    let inventory = match existing {
        Some(row) => {
            let new_quantity = row.quantity + delta;
            if new_quantity < 0 {
                return Err(AppError::insufficient_stock(format!(
                    "Insufficient stock. Available: {}, Requested: {}",
                    row.quantity, -delta
                )));
            }
            sqlx::query_as::<_, Inventory>(
                "UPDATE inventories SET quantity = $1 WHERE id = $2
                 RETURNING id, product_id, quantity, warehouse_id",
            )
            .bind(new_quantity)
            .bind(row.id)
            .fetch_one(&mut *tx)
            .await?
        }
        None => {
            if delta < 0 {
                return Err(AppError::insufficient_stock(format!(
                    "Insufficient stock. Available: 0, Requested: {}",
                    -delta
                )));
            }
            sqlx::query_as::<_, Inventory>(
                "INSERT INTO inventories (product_id, quantity) VALUES ($1, $2)
                 RETURNING id, product_id, quantity, warehouse_id",
            )
            .bind(product_id)
            .bind(delta)
            .fetch_one(&mut *tx)
            .await?
        }
    };

    tx.commit().await?;
    Ok(inventory)
}
