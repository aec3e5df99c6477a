// src/handlers/auth.rs
use axum::{extract::State, Extension, Json};
use bcrypt::verify;
use tracing::instrument;

use crate::auth::jwt::sign_token;
use crate::dtos::user::{LoginRequest, LoginResponse, UserResponse};
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::models::user::User;
use crate::state::AppState;

const USER_COLUMNS: &str =
    "id, username, email, full_name, password_hash, is_active, is_superuser, role_id, created_at";

// POST /auth/login
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if payload.username.trim().is_empty() {
        return Err(AppError::validation("Username required"));
    }
    if payload.password.is_empty() {
        return Err(AppError::validation("Password required"));
    }

    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
    ))
    .bind(&payload.username)
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| AppError::unauthorized("Incorrect username or password"))?;

    let ok = verify(&payload.password, &user.password_hash)
        .map_err(|e| AppError::internal(format!("Password verify error: {e}")))?;
    if !ok {
        return Err(AppError::unauthorized("Incorrect username or password"));
    }

    if !user.is_active {
        return Err(AppError::unauthorized("Inactive user"));
    }

    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::internal("JWT secret not configured"))?;
    let token = sign_token(user.id, &user.username, &secret)?;

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(LoginResponse {
        access_token: token,
        token_type: "bearer",
        user: UserResponse::from(user),
    }))
}

// GET /auth/me - Profile of the authenticated caller
#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<UserResponse>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(auth.user_id)
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| AppError::unauthorized("User no longer exists"))?;

    Ok(Json(UserResponse::from(user)))
}
