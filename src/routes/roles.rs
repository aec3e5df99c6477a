use axum::{routing::get, Router};

use crate::handlers::role::{create_role, delete_role, get_role, get_roles, update_role};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/roles", get(get_roles).post(create_role))
        .route("/roles/{id}", get(get_role).put(update_role).delete(delete_role))
        .route_layer(axum::middleware::from_fn(require_auth))
}
