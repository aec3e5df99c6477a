//! Role-permission membership synchronizer.
//!
//! A role's membership set is reconciled against the caller-supplied
//! `permission_ids` as one atomic set-replacement: delete every join row for
//! the role, then insert one row per resolved permission, inside a single
//! transaction. Readers never observe a half-replaced membership. Unknown
//! permission ids are resolved against the `permissions` table and silently
//! dropped rather than rejected.

use sqlx::{PgExecutor, PgPool};

use crate::dtos::role::{CreateRoleRequest, UpdateRoleRequest};
use crate::error::{map_unique_violation, AppError};
use crate::models::permission::Permission;
use crate::models::role::Role;

const DUPLICATE_NAME: &str = "Role name already exists";

pub async fn create_role(
    pool: &PgPool,
    req: CreateRoleRequest,
) -> Result<(Role, Vec<Permission>), AppError> {
    let mut tx = pool.begin().await?;

    let role = sqlx::query_as::<_, Role>(
        "INSERT INTO roles (name, description) VALUES ($1, $2)
         RETURNING id, name, description",
    )
    .bind(&req.name)
    .bind(&req.description)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| map_unique_violation(e, DUPLICATE_NAME))?;

    if let Some(ids) = &req.permission_ids {
        insert_memberships(&mut *tx, role.id, ids).await?;
    }

    let permissions = load_memberships(&mut *tx, role.id).await?;
    tx.commit().await?;

    tracing::info!(role_id = role.id, name = %role.name, "Role created");
    Ok((role, permissions))
}

pub async fn update_role(
    pool: &PgPool,
    role_id: i64,
    req: UpdateRoleRequest,
) -> Result<(Role, Vec<Permission>), AppError> {
    let mut tx = pool.begin().await?;

    // Lock the role row so two concurrent updates cannot interleave their
    // scalar writes with each other's membership replacement.
    let existing = sqlx::query_as::<_, Role>(
        "SELECT id, name, description FROM roles WHERE id = $1 FOR UPDATE",
    )
    .bind(role_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::not_found("Role not found"))?;

    // Explicit merge: only supplied fields change.
    let name = req.name.unwrap_or(existing.name);
    let description = req.description.or(existing.description);

    let role = sqlx::query_as::<_, Role>(
        "UPDATE roles SET name = $1, description = $2 WHERE id = $3
         RETURNING id, name, description",
    )
    .bind(&name)
    .bind(&description)
    .bind(role_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| map_unique_violation(e, DUPLICATE_NAME))?;

    if let Some(ids) = &req.permission_ids {
        // Full set-replacement; an empty desired set clears the membership.
        sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
            .bind(role_id)
            .execute(&mut *tx)
            .await?;
        insert_memberships(&mut *tx, role_id, ids).await?;
    }

    let permissions = load_memberships(&mut *tx, role_id).await?;
    tx.commit().await?;

    Ok((role, permissions))
}

/// Deletes the role after purging its join rows and detaching its users,
/// so no dangling reference survives the commit.
pub async fn delete_role(pool: &PgPool, role_id: i64) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
        .bind(role_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("UPDATE users SET role_id = NULL WHERE role_id = $1")
        .bind(role_id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM roles WHERE id = $1")
        .bind(role_id)
        .execute(&mut *tx)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Role not found"));
    }

    tx.commit().await?;
    tracing::info!(role_id, "Role deleted");
    Ok(())
}

pub async fn get_role(pool: &PgPool, role_id: i64) -> Result<(Role, Vec<Permission>), AppError> {
    let role = sqlx::query_as::<_, Role>(
        "SELECT id, name, description FROM roles WHERE id = $1",
    )
    .bind(role_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::not_found("Role not found"))?;

    let permissions = load_memberships(pool, role_id).await?;
    Ok((role, permissions))
}

pub async fn list_roles(
    pool: &PgPool,
    skip: i64,
    limit: i64,
) -> Result<Vec<(Role, Vec<Permission>)>, AppError> {
    let roles = sqlx::query_as::<_, Role>(
        "SELECT id, name, description FROM roles ORDER BY id OFFSET $1 LIMIT $2",
    )
    .bind(skip)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    let mut result = Vec::with_capacity(roles.len());
    for role in roles {
        let permissions = load_memberships(pool, role.id).await?;
        result.push((role, permissions));
    }
    Ok(result)
}

/// Inserts one join row per desired permission that actually exists;
/// resolving through the `permissions` table also deduplicates the input.
async fn insert_memberships<'e, E>(exec: E, role_id: i64, ids: &[i64]) -> Result<(), sqlx::Error>
where
    E: PgExecutor<'e>,
{
    if ids.is_empty() {
        return Ok(());
    }
    sqlx::query(
        "INSERT INTO role_permissions (role_id, permission_id)
         SELECT $1, id FROM permissions WHERE id = ANY($2)",
    )
    .bind(role_id)
    .bind(ids)
    .execute(exec)
    .await?;
    Ok(())
}

async fn load_memberships<'e, E>(exec: E, role_id: i64) -> Result<Vec<Permission>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Permission>(
        "SELECT p.id, p.name, p.description
         FROM permissions p
         JOIN role_permissions rp ON rp.permission_id = p.id
         WHERE rp.role_id = $1
         ORDER BY p.id",
    )
    .bind(role_id)
    .fetch_all(exec)
    .await
}
