use axum::{routing::get, Router};

use crate::handlers::warehouse::{
    create_warehouse, delete_warehouse, get_warehouse, get_warehouses, update_warehouse,
};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/warehouses", get(get_warehouses).post(create_warehouse))
        .route(
            "/warehouses/{id}",
            get(get_warehouse).put(update_warehouse).delete(delete_warehouse),
        )
        .route_layer(axum::middleware::from_fn(require_auth))
}
