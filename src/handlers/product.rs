// src/handlers/product.rs
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{error, instrument};

use crate::dtos::product::{CreateProductRequest, ProductResponse, UpdateProductRequest};
use crate::dtos::ListParams;
use crate::error::{map_unique_violation, AppError};
use crate::models::product::Product;
use crate::state::AppState;

const DUPLICATE_CODE: &str = "Product code already exists";
const DUPLICATE_NAME: &str = "Product name already exists";

fn map_duplicate(err: sqlx::Error) -> AppError {
    let message = match &err {
        sqlx::Error::Database(db_err) if db_err.constraint() == Some("products_name_key") => {
            DUPLICATE_NAME
        }
        _ => DUPLICATE_CODE,
    };
    map_unique_violation(err, message)
}

// GET /products - List products with pagination
#[instrument(skip(state))]
pub async fn get_products(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let (skip, limit) = params.clamp();
    match sqlx::query_as::<_, Product>(
        "SELECT id, name, code, description, category, unit, price, cost, created_at
         FROM products ORDER BY id OFFSET $1 LIMIT $2",
    )
    .bind(skip)
    .bind(limit)
    .fetch_all(&state.db_pool)
    .await
    {
        Ok(products) => {
            let response = products.into_iter().map(ProductResponse::from).collect();
            Ok(Json(response))
        }
        Err(e) => {
            error!(?e, "Failed to fetch products");
            Err(e.into())
        }
    }
}

// GET /products/:id - Get single product
#[instrument(skip(state), fields(id))]
pub async fn get_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = sqlx::query_as::<_, Product>(
        "SELECT id, name, code, description, category, unit, price, cost, created_at
         FROM products WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Product not found"))?;

    Ok(Json(ProductResponse::from(product)))
}

// POST /products - Create new product
#[instrument(skip(state, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Product name required"));
    }
    if payload.code.trim().is_empty() {
        return Err(AppError::validation("Product code required"));
    }

    let product = sqlx::query_as::<_, Product>(
        "INSERT INTO products (name, code, description, category, unit, price, cost)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING id, name, code, description, category, unit, price, cost, created_at",
    )
    .bind(&payload.name)
    .bind(&payload.code)
    .bind(&payload.description)
    .bind(&payload.category)
    .bind(&payload.unit)
    .bind(payload.price)
    .bind(payload.cost)
    .fetch_one(&state.db_pool)
    .await
    .map_err(map_duplicate)?;

    Ok((StatusCode::CREATED, Json(ProductResponse::from(product))))
}

// PUT /products/:id - Update product (only supplied fields change)
#[instrument(skip(state, payload), fields(id))]
pub async fn update_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = sqlx::query_as::<_, Product>(
        "UPDATE products SET
         name = COALESCE($1, name),
         code = COALESCE($2, code),
         description = COALESCE($3, description),
         category = COALESCE($4, category),
         unit = COALESCE($5, unit),
         price = COALESCE($6, price),
         cost = COALESCE($7, cost)
         WHERE id = $8
         RETURNING id, name, code, description, category, unit, price, cost, created_at",
    )
    .bind(payload.name)
    .bind(payload.code)
    .bind(payload.description)
    .bind(payload.category)
    .bind(payload.unit)
    .bind(payload.price)
    .bind(payload.cost)
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await
    .map_err(map_duplicate)?
    .ok_or_else(|| AppError::not_found("Product not found"))?;

    Ok(Json(ProductResponse::from(product)))
}

// DELETE /products/:id - Delete product
#[instrument(skip(state), fields(id))]
pub async fn delete_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(&state.db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Product not found"));
    }

    Ok(Json(serde_json::json!({ "message": "Product deleted successfully" })))
}
