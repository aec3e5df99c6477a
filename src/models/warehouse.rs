use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub struct Warehouse {
    pub id: i64,
    pub name: String,
    pub location: Option<String>,
    pub description: Option<String>,
}
