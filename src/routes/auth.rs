use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::handlers::auth::{get_me, login};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    let open = Router::new().route("/auth/login", post(login));

    let protected = Router::new()
        .route("/auth/me", get(get_me))
        .layer(middleware::from_fn(require_auth));

    open.merge(protected)
}
