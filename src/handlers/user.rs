// src/handlers/user.rs
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use bcrypt::{hash, DEFAULT_COST};
use tracing::instrument;

use crate::dtos::user::{CreateUserRequest, UpdateUserRequest, UserResponse};
use crate::dtos::ListParams;
use crate::error::{map_unique_violation, AppError};
use crate::models::user::User;
use crate::state::AppState;

const USER_COLUMNS: &str =
    "id, username, email, full_name, password_hash, is_active, is_superuser, role_id, created_at";

fn map_duplicate(err: sqlx::Error) -> AppError {
    let message = match &err {
        sqlx::Error::Database(db_err) if db_err.constraint() == Some("users_email_key") => {
            "Email already registered"
        }
        _ => "Username already registered",
    };
    map_unique_violation(err, message)
}

fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST).map_err(|e| AppError::internal(format!("Hash error: {e}")))
}

// GET /users - List users with pagination
#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let (skip, limit) = params.clamp();
    let users = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY id OFFSET $1 LIMIT $2"
    ))
    .bind(skip)
    .bind(limit)
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

// GET /users/:id - Get single user
#[instrument(skip(state), fields(id))]
pub async fn get_user(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(UserResponse::from(user)))
}

// POST /users - Create new user
#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    if payload.username.trim().is_empty() {
        return Err(AppError::validation("Username required"));
    }
    if payload.email.trim().is_empty() || !payload.email.contains('@') {
        return Err(AppError::validation("Valid email required"));
    }
    if payload.password.len() < 6 {
        return Err(AppError::validation("Password too short"));
    }
    if let Some(role_id) = payload.role_id {
        ensure_role_exists(&state, role_id).await?;
    }

    let password_hash = hash_password(&payload.password)?;

    let user = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (username, email, full_name, password_hash, is_active, is_superuser, role_id)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING {USER_COLUMNS}"
    ))
    .bind(&payload.username)
    .bind(&payload.email)
    .bind(&payload.full_name)
    .bind(&password_hash)
    .bind(payload.is_active)
    .bind(payload.is_superuser)
    .bind(payload.role_id)
    .fetch_one(&state.db_pool)
    .await
    .map_err(map_duplicate)?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

// PUT /users/:id - Update user (only supplied fields change; password re-hashed)
#[instrument(skip(state, payload), fields(id))]
pub async fn update_user(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    if let Some(role_id) = payload.role_id {
        ensure_role_exists(&state, role_id).await?;
    }

    let password_hash = match &payload.password {
        Some(password) => {
            if password.len() < 6 {
                return Err(AppError::validation("Password too short"));
            }
            Some(hash_password(password)?)
        }
        None => None,
    };

    let user = sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET
         username = COALESCE($1, username),
         email = COALESCE($2, email),
         full_name = COALESCE($3, full_name),
         password_hash = COALESCE($4, password_hash),
         is_active = COALESCE($5, is_active),
         is_superuser = COALESCE($6, is_superuser),
         role_id = COALESCE($7, role_id)
         WHERE id = $8
         RETURNING {USER_COLUMNS}"
    ))
    .bind(payload.username)
    .bind(payload.email)
    .bind(payload.full_name)
    .bind(password_hash)
    .bind(payload.is_active)
    .bind(payload.is_superuser)
    .bind(payload.role_id)
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await
    .map_err(map_duplicate)?
    .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(UserResponse::from(user)))
}

// DELETE /users/:id - Delete user
#[instrument(skip(state), fields(id))]
pub async fn delete_user(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(&state.db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("User not found"));
    }

    Ok(Json(serde_json::json!({ "message": "User deleted successfully" })))
}

async fn ensure_role_exists(state: &AppState, role_id: i64) -> Result<(), AppError> {
    let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM roles WHERE id = $1")
        .bind(role_id)
        .fetch_optional(&state.db_pool)
        .await?;
    exists
        .map(|_| ())
        .ok_or_else(|| AppError::not_found("Role not found"))
}
