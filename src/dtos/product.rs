// src/dtos/product.rs
use serde::{Deserialize, Serialize};

fn default_unit() -> String {
    "unit".to_string()
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub cost: f64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub price: Option<f64>,
    pub cost: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub unit: String,
    pub price: f64,
    pub cost: f64,
    pub created_at: Option<String>,
}

// Convert from Model to Response DTO
impl From<crate::models::product::Product> for ProductResponse {
    fn from(product: crate::models::product::Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            code: product.code,
            description: product.description,
            category: product.category,
            unit: product.unit,
            price: product.price,
            cost: product.cost,
            created_at: product.created_at.map(|dt| dt.to_rfc3339()),
        }
    }
}
