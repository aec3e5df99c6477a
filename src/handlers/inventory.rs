// src/handlers/inventory.rs
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::instrument;

use crate::dtos::inventory::{
    CreateInventoryRequest, InventoryResponse, MovementParams, UpdateInventoryRequest,
};
use crate::dtos::ListParams;
use crate::error::AppError;
use crate::models::inventory::Inventory;
use crate::services::ledger;
use crate::state::AppState;

// PUT /inventories/:product_id/inbound?quantity=N
#[instrument(skip(state), fields(product_id))]
pub async fn inventory_inbound(
    Path(product_id): Path<i64>,
    Query(params): Query<MovementParams>,
    State(state): State<AppState>,
) -> Result<Json<InventoryResponse>, AppError> {
    if params.quantity < 1 {
        return Err(AppError::validation("quantity must be at least 1"));
    }
    let inventory = ledger::apply_movement(&state.db_pool, product_id, params.quantity).await?;
    Ok(Json(InventoryResponse::from(inventory)))
}

// PUT /inventories/:product_id/outbound?quantity=N
#[instrument(skip(state), fields(product_id))]
pub async fn inventory_outbound(
    Path(product_id): Path<i64>,
    Query(params): Query<MovementParams>,
    State(state): State<AppState>,
) -> Result<Json<InventoryResponse>, AppError> {
    if params.quantity < 1 {
        return Err(AppError::validation("quantity must be at least 1"));
    }
    let inventory = ledger::apply_movement(&state.db_pool, product_id, -params.quantity).await?;
    Ok(Json(InventoryResponse::from(inventory)))
}

// GET /inventories - List inventories with pagination
#[instrument(skip(state))]
pub async fn get_inventories(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<InventoryResponse>>, AppError> {
    let (skip, limit) = params.clamp();
    let inventories = sqlx::query_as::<_, Inventory>(
        "SELECT id, product_id, quantity, warehouse_id
         FROM inventories ORDER BY id OFFSET $1 LIMIT $2",
    )
    .bind(skip)
    .bind(limit)
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(inventories.into_iter().map(InventoryResponse::from).collect()))
}

// GET /inventories/:id - Get single inventory record
#[instrument(skip(state), fields(id))]
pub async fn get_inventory(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<InventoryResponse>, AppError> {
    let inventory = sqlx::query_as::<_, Inventory>(
        "SELECT id, product_id, quantity, warehouse_id FROM inventories WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Inventory not found"))?;

    Ok(Json(InventoryResponse::from(inventory)))
}

// POST /inventories - Create inventory record
#[instrument(skip(state, payload))]
pub async fn create_inventory(
    State(state): State<AppState>,
    Json(payload): Json<CreateInventoryRequest>,
) -> Result<(StatusCode, Json<InventoryResponse>), AppError> {
    if payload.quantity < 0 {
        return Err(AppError::validation("quantity cannot be negative"));
    }

    ensure_product_exists(&state, payload.product_id).await?;
    if let Some(warehouse_id) = payload.warehouse_id {
        ensure_warehouse_exists(&state, warehouse_id).await?;
    }

    let inventory = sqlx::query_as::<_, Inventory>(
        "INSERT INTO inventories (product_id, quantity, warehouse_id)
         VALUES ($1, $2, $3) RETURNING id, product_id, quantity, warehouse_id",
    )
    .bind(payload.product_id)
    .bind(payload.quantity)
    .bind(payload.warehouse_id)
    .fetch_one(&state.db_pool)
    .await?;

    Ok((StatusCode::CREATED, Json(InventoryResponse::from(inventory))))
}

// PUT /inventories/:id - Update inventory record (only supplied fields change)
#[instrument(skip(state, payload), fields(id))]
pub async fn update_inventory(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateInventoryRequest>,
) -> Result<Json<InventoryResponse>, AppError> {
    if let Some(quantity) = payload.quantity {
        if quantity < 0 {
            return Err(AppError::validation("quantity cannot be negative"));
        }
    }
    if let Some(warehouse_id) = payload.warehouse_id {
        ensure_warehouse_exists(&state, warehouse_id).await?;
    }

    let inventory = sqlx::query_as::<_, Inventory>(
        "UPDATE inventories SET
         quantity = COALESCE($1, quantity),
         warehouse_id = COALESCE($2, warehouse_id)
         WHERE id = $3 RETURNING id, product_id, quantity, warehouse_id",
    )
    .bind(payload.quantity)
    .bind(payload.warehouse_id)
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Inventory not found"))?;

    Ok(Json(InventoryResponse::from(inventory)))
}

// DELETE /inventories/:id - Delete inventory record
#[instrument(skip(state), fields(id))]
pub async fn delete_inventory(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = sqlx::query("DELETE FROM inventories WHERE id = $1")
        .bind(id)
        .execute(&state.db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Inventory not found"));
    }

    Ok(Json(serde_json::json!({ "message": "Inventory deleted successfully" })))
}

async fn ensure_product_exists(state: &AppState, product_id: i64) -> Result<(), AppError> {
    let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM products WHERE id = $1")
        .bind(product_id)
        .fetch_optional(&state.db_pool)
        .await?;
    exists
        .map(|_| ())
        .ok_or_else(|| AppError::not_found("Product not found"))
}

async fn ensure_warehouse_exists(state: &AppState, warehouse_id: i64) -> Result<(), AppError> {
    let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM warehouses WHERE id = $1")
        .bind(warehouse_id)
        .fetch_optional(&state.db_pool)
        .await?;
    exists
        .map(|_| ())
        .ok_or_else(|| AppError::not_found("Warehouse not found"))
}
