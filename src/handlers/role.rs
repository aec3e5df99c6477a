// src/handlers/role.rs
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::instrument;

use crate::dtos::permission::PermissionResponse;
use crate::dtos::role::{CreateRoleRequest, RoleResponse, UpdateRoleRequest};
use crate::dtos::ListParams;
use crate::error::AppError;
use crate::models::permission::Permission;
use crate::models::role::Role;
use crate::services::role_sync;
use crate::state::AppState;

fn to_response((role, permissions): (Role, Vec<Permission>)) -> RoleResponse {
    RoleResponse {
        id: role.id,
        name: role.name,
        description: role.description,
        permissions: permissions.into_iter().map(PermissionResponse::from).collect(),
    }
}

// POST /roles - Create role with optional permission set
#[instrument(skip(state, payload))]
pub async fn create_role(
    State(state): State<AppState>,
    Json(payload): Json<CreateRoleRequest>,
) -> Result<(StatusCode, Json<RoleResponse>), AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Role name required"));
    }
    let created = role_sync::create_role(&state.db_pool, payload).await?;
    Ok((StatusCode::CREATED, Json(to_response(created))))
}

// GET /roles - List roles with membership
#[instrument(skip(state))]
pub async fn get_roles(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<RoleResponse>>, AppError> {
    let (skip, limit) = params.clamp();
    let roles = role_sync::list_roles(&state.db_pool, skip, limit).await?;
    Ok(Json(roles.into_iter().map(to_response).collect()))
}

// GET /roles/:id - Get role with membership
#[instrument(skip(state), fields(id))]
pub async fn get_role(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<RoleResponse>, AppError> {
    let role = role_sync::get_role(&state.db_pool, id).await?;
    Ok(Json(to_response(role)))
}

// PUT /roles/:id - Update role; permission_ids replaces the membership set
#[instrument(skip(state, payload), fields(id))]
pub async fn update_role(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateRoleRequest>,
) -> Result<Json<RoleResponse>, AppError> {
    let updated = role_sync::update_role(&state.db_pool, id, payload).await?;
    Ok(Json(to_response(updated)))
}

// DELETE /roles/:id - Delete role and purge its membership
#[instrument(skip(state), fields(id))]
pub async fn delete_role(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    role_sync::delete_role(&state.db_pool, id).await?;
    Ok(Json(serde_json::json!({ "message": "Role deleted successfully" })))
}
