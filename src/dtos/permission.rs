// src/dtos/permission.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreatePermissionRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePermissionRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PermissionResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

impl From<crate::models::permission::Permission> for PermissionResponse {
    fn from(permission: crate::models::permission::Permission) -> Self {
        Self {
            id: permission.id,
            name: permission.name,
            description: permission.description,
        }
    }
}
