// src/handlers/permission.rs
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::instrument;

use crate::dtos::permission::{
    CreatePermissionRequest, PermissionResponse, UpdatePermissionRequest,
};
use crate::dtos::ListParams;
use crate::error::{map_unique_violation, AppError};
use crate::models::permission::Permission;
use crate::state::AppState;

const DUPLICATE_NAME: &str = "Permission name already exists";

// GET /permissions - List permissions with pagination
#[instrument(skip(state))]
pub async fn get_permissions(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<PermissionResponse>>, AppError> {
    let (skip, limit) = params.clamp();
    let permissions = sqlx::query_as::<_, Permission>(
        "SELECT id, name, description FROM permissions ORDER BY id OFFSET $1 LIMIT $2",
    )
    .bind(skip)
    .bind(limit)
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(permissions.into_iter().map(PermissionResponse::from).collect()))
}

// GET /permissions/:id - Get single permission
#[instrument(skip(state), fields(id))]
pub async fn get_permission(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<PermissionResponse>, AppError> {
    let permission = sqlx::query_as::<_, Permission>(
        "SELECT id, name, description FROM permissions WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Permission not found"))?;

    Ok(Json(PermissionResponse::from(permission)))
}

// POST /permissions - Create new permission
#[instrument(skip(state, payload))]
pub async fn create_permission(
    State(state): State<AppState>,
    Json(payload): Json<CreatePermissionRequest>,
) -> Result<(StatusCode, Json<PermissionResponse>), AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Permission name required"));
    }

    let permission = sqlx::query_as::<_, Permission>(
        "INSERT INTO permissions (name, description)
         VALUES ($1, $2) RETURNING id, name, description",
    )
    .bind(&payload.name)
    .bind(&payload.description)
    .fetch_one(&state.db_pool)
    .await
    .map_err(|e| map_unique_violation(e, DUPLICATE_NAME))?;

    Ok((StatusCode::CREATED, Json(PermissionResponse::from(permission))))
}

// PUT /permissions/:id - Update permission (only supplied fields change)
#[instrument(skip(state, payload), fields(id))]
pub async fn update_permission(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<UpdatePermissionRequest>,
) -> Result<Json<PermissionResponse>, AppError> {
    let permission = sqlx::query_as::<_, Permission>(
        "UPDATE permissions SET
         name = COALESCE($1, name),
         description = COALESCE($2, description)
         WHERE id = $3 RETURNING id, name, description",
    )
    .bind(payload.name)
    .bind(payload.description)
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await
    .map_err(|e| map_unique_violation(e, DUPLICATE_NAME))?
    .ok_or_else(|| AppError::not_found("Permission not found"))?;

    Ok(Json(PermissionResponse::from(permission)))
}

// DELETE /permissions/:id - Delete permission and its join rows
#[instrument(skip(state), fields(id))]
pub async fn delete_permission(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut tx = state.db_pool.begin().await?;

    // No role may keep a join row pointing at a deleted permission.
    sqlx::query("DELETE FROM role_permissions WHERE permission_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM permissions WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Permission not found"));
    }

    tx.commit().await?;
    Ok(Json(serde_json::json!({ "message": "Permission deleted successfully" })))
}
