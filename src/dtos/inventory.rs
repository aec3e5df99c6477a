// src/dtos/inventory.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateInventoryRequest {
    pub product_id: i64,
    #[serde(default)]
    pub quantity: i64,
    pub warehouse_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateInventoryRequest {
    pub quantity: Option<i64>,
    pub warehouse_id: Option<i64>,
}

/// `?quantity=N` parameter of the inbound/outbound endpoints.
#[derive(Debug, Deserialize)]
pub struct MovementParams {
    pub quantity: i64,
}

#[derive(Debug, Serialize)]
pub struct InventoryResponse {
    pub id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub warehouse_id: Option<i64>,
}

impl From<crate::models::inventory::Inventory> for InventoryResponse {
    fn from(inventory: crate::models::inventory::Inventory) -> Self {
        Self {
            id: inventory.id,
            product_id: inventory.product_id,
            quantity: inventory.quantity,
            warehouse_id: inventory.warehouse_id,
        }
    }
}
