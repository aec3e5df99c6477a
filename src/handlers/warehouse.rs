// src/handlers/warehouse.rs
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::instrument;

use crate::dtos::warehouse::{CreateWarehouseRequest, UpdateWarehouseRequest, WarehouseResponse};
use crate::dtos::ListParams;
use crate::error::{map_unique_violation, AppError};
use crate::models::warehouse::Warehouse;
use crate::state::AppState;

const DUPLICATE_NAME: &str = "Warehouse name already exists";

// GET /warehouses - List warehouses with pagination
#[instrument(skip(state))]
pub async fn get_warehouses(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<WarehouseResponse>>, AppError> {
    let (skip, limit) = params.clamp();
    let warehouses = sqlx::query_as::<_, Warehouse>(
        "SELECT id, name, location, description
         FROM warehouses ORDER BY id OFFSET $1 LIMIT $2",
    )
    .bind(skip)
    .bind(limit)
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(warehouses.into_iter().map(WarehouseResponse::from).collect()))
}

// GET /warehouses/:id - Get single warehouse
#[instrument(skip(state), fields(id))]
pub async fn get_warehouse(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<WarehouseResponse>, AppError> {
    let warehouse = sqlx::query_as::<_, Warehouse>(
        "SELECT id, name, location, description FROM warehouses WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Warehouse not found"))?;

    Ok(Json(WarehouseResponse::from(warehouse)))
}

// POST /warehouses - Create new warehouse
#[instrument(skip(state, payload))]
pub async fn create_warehouse(
    State(state): State<AppState>,
    Json(payload): Json<CreateWarehouseRequest>,
) -> Result<(StatusCode, Json<WarehouseResponse>), AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Warehouse name required"));
    }

    let warehouse = sqlx::query_as::<_, Warehouse>(
        "INSERT INTO warehouses (name, location, description)
         VALUES ($1, $2, $3) RETURNING id, name, location, description",
    )
    .bind(&payload.name)
    .bind(&payload.location)
    .bind(&payload.description)
    .fetch_one(&state.db_pool)
    .await
    .map_err(|e| map_unique_violation(e, DUPLICATE_NAME))?;

    Ok((StatusCode::CREATED, Json(WarehouseResponse::from(warehouse))))
}

// PUT /warehouses/:id - Update warehouse (only supplied fields change)
#[instrument(skip(state, payload), fields(id))]
pub async fn update_warehouse(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateWarehouseRequest>,
) -> Result<Json<WarehouseResponse>, AppError> {
    let warehouse = sqlx::query_as::<_, Warehouse>(
        "UPDATE warehouses SET
         name = COALESCE($1, name),
         location = COALESCE($2, location),
         description = COALESCE($3, description)
         WHERE id = $4 RETURNING id, name, location, description",
    )
    .bind(payload.name)
    .bind(payload.location)
    .bind(payload.description)
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await
    .map_err(|e| map_unique_violation(e, DUPLICATE_NAME))?
    .ok_or_else(|| AppError::not_found("Warehouse not found"))?;

    Ok(Json(WarehouseResponse::from(warehouse)))
}

// DELETE /warehouses/:id - Delete warehouse
#[instrument(skip(state), fields(id))]
pub async fn delete_warehouse(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = sqlx::query("DELETE FROM warehouses WHERE id = $1")
        .bind(id)
        .execute(&state.db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Warehouse not found"));
    }

    Ok(Json(serde_json::json!({ "message": "Warehouse deleted successfully" })))
}
