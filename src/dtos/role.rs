// src/dtos/role.rs
use serde::{Deserialize, Serialize};

use super::permission::PermissionResponse;

#[derive(Debug, Deserialize)]
pub struct CreateRoleRequest {
    pub name: String,
    pub description: Option<String>,
    /// Desired membership set; `None` means no permissions are attached.
    pub permission_ids: Option<Vec<i64>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Desired membership set. `None` leaves the membership untouched;
    /// `Some(vec![])` removes every permission from the role.
    pub permission_ids: Option<Vec<i64>>,
}

#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub permissions: Vec<PermissionResponse>,
}
