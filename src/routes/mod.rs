pub mod auth;
pub mod inventories;
pub mod permissions;
pub mod products;
pub mod roles;
pub mod users;
pub mod warehouses;

use axum::Router;

use crate::state::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(auth::routes())
        .merge(users::routes())
        .merge(roles::routes())
        .merge(permissions::routes())
        .merge(products::routes())
        .merge(warehouses::routes())
        .merge(inventories::routes())
}
