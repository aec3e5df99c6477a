pub mod inventory;
pub mod permission;
pub mod product;
pub mod role;
pub mod user;
pub mod warehouse;

use serde::Deserialize;

fn default_limit() -> i64 {
    100
}

/// Common `?skip=&limit=` pagination parameters for list endpoints.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

impl ListParams {
    pub fn clamp(&self) -> (i64, i64) {
        (self.skip.max(0), self.limit.clamp(1, 1000))
    }
}
