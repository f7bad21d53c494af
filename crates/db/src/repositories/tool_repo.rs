//! Repository for the `tools` table.

use sqlx::PgPool;
use toolforge_core::types::DbId;

use crate::models::tool::{CreateTool, Tool, UpdateTool, STATUS_ACTIVE};

const COLUMNS: &str = "id, name, slug, description, category, icon, status, \
     webhook_url, fields, features, sort_order, created_at, updated_at";

/// Provides CRUD operations for the tool catalogue.
pub struct ToolRepo;

impl ToolRepo {
    /// Insert a new tool, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateTool) -> Result<Tool, sqlx::Error> {
        let query = format!(
            "INSERT INTO tools \
                (name, slug, description, category, icon, status, webhook_url, \
                 fields, features, sort_order) \
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'active'), $7, \
                     COALESCE($8, '[]'::jsonb), $9, COALESCE($10, 0)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tool>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.icon)
            .bind(&input.status)
            .bind(&input.webhook_url)
            .bind(&input.fields)
            .bind(&input.features)
            .bind(input.sort_order)
            .fetch_one(pool)
            .await
    }

    /// Find a tool by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Tool>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tools WHERE id = $1");
        sqlx::query_as::<_, Tool>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a tool by its public slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Tool>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tools WHERE slug = $1");
        sqlx::query_as::<_, Tool>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List active tools for the public catalogue, in display order.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Tool>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tools \
             WHERE status = $1 \
             ORDER BY sort_order ASC, name ASC"
        );
        sqlx::query_as::<_, Tool>(&query)
            .bind(STATUS_ACTIVE)
            .fetch_all(pool)
            .await
    }

    /// List every tool regardless of status (admin view).
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Tool>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tools ORDER BY sort_order ASC, name ASC");
        sqlx::query_as::<_, Tool>(&query).fetch_all(pool).await
    }

    /// Update a tool. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTool,
    ) -> Result<Option<Tool>, sqlx::Error> {
        let query = format!(
            "UPDATE tools SET \
                name = COALESCE($2, name), \
                slug = COALESCE($3, slug), \
                description = COALESCE($4, description), \
                category = COALESCE($5, category), \
                icon = COALESCE($6, icon), \
                status = COALESCE($7, status), \
                webhook_url = COALESCE($8, webhook_url), \
                fields = COALESCE($9, fields), \
                features = COALESCE($10, features), \
                sort_order = COALESCE($11, sort_order), \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tool>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.icon)
            .bind(&input.status)
            .bind(&input.webhook_url)
            .bind(&input.fields)
            .bind(&input.features)
            .bind(input.sort_order)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a tool by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tools WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
