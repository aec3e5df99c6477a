// src/dtos/warehouse.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateWarehouseRequest {
    pub name: String,
    pub location: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateWarehouseRequest {
    pub name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WarehouseResponse {
    pub id: i64,
    pub name: String,
    pub location: Option<String>,
    pub description: Option<String>,
}

impl From<crate::models::warehouse::Warehouse> for WarehouseResponse {
    fn from(warehouse: crate::models::warehouse::Warehouse) -> Self {
        Self {
            id: warehouse.id,
            name: warehouse.name,
            location: warehouse.location,
            description: warehouse.description,
        }
    }
}
