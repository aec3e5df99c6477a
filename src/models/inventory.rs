use sqlx::FromRow;

/// One stock record. A product may have at most one row per warehouse;
/// `quantity` never goes below zero on any committed state.
#[derive(Debug, FromRow)]
pub struct Inventory {
    pub id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub warehouse_id: Option<i64>,
}
