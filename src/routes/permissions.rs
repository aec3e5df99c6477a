use axum::{routing::get, Router};

use crate::handlers::permission::{
    create_permission, delete_permission, get_permission, get_permissions, update_permission,
};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/permissions", get(get_permissions).post(create_permission))
        .route(
            "/permissions/{id}",
            get(get_permission).put(update_permission).delete(delete_permission),
        )
        .route_layer(axum::middleware::from_fn(require_auth))
}
