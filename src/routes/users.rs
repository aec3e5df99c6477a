use axum::{routing::get, Router};

use crate::handlers::user::{create_user, delete_user, get_user, get_users, update_user};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(get_users).post(create_user))
        .route("/users/{id}", get(get_user).put(update_user).delete(delete_user))
        .route_layer(axum::middleware::from_fn(require_auth))
}
