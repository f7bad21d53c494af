//! Repository for the `roles` lookup table.

use sqlx::PgPool;
use toolforge_core::types::DbId;

use crate::models::role::Role;

/// Provides role lookups. There is exactly one role store; all role checks
/// resolve through it.
pub struct RoleRepo;

impl RoleRepo {
    /// Resolve a role ID to its name.
    pub async fn resolve_name(pool: &PgPool, id: DbId) -> Result<String, sqlx::Error> {
        let (name,): (String,) = sqlx::query_as("SELECT name FROM roles WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(name)
    }

    /// Find a role by name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Role>, sqlx::Error> {
        sqlx::query_as::<_, Role>("SELECT id, name, description FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await
    }
}
