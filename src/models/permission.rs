use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub struct Permission {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}
