use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub unit: String,
    pub price: f64,
    pub cost: f64,
    pub created_at: Option<DateTime<Utc>>,
}
