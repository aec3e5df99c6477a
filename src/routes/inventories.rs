use axum::{
    routing::{get, put},
    Router,
};

use crate::handlers::inventory::{
    create_inventory, delete_inventory, get_inventories, get_inventory, inventory_inbound,
    inventory_outbound, update_inventory,
};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/inventories", get(get_inventories).post(create_inventory))
        // Ledger endpoints come before the generic {id} routes on purpose:
        // the movement key is the product id, not the inventory id.
        .route("/inventories/{product_id}/inbound", put(inventory_inbound))
        .route("/inventories/{product_id}/outbound", put(inventory_outbound))
        .route(
            "/inventories/{id}",
            get(get_inventory).put(update_inventory).delete(delete_inventory),
        )
        .route_layer(axum::middleware::from_fn(require_auth))
}
