use sqlx::PgPool;

use crate::db::models::{Material, ValidatedMaterial};
use crate::db::{with_retry, DatabaseError};

/// Column list for materials queries.
const MATERIAL_COLUMNS: &str = "id, title, category, description, content, created_at, updated_at";

pub struct MaterialRepository;

impl MaterialRepository {
    pub async fn create(
        pool: &PgPool,
        material: &ValidatedMaterial,
    ) -> Result<Material, DatabaseError> {
        let query = format!(
            "INSERT INTO materials (title, category, description, content)
             VALUES ($1, $2, $3, $4)
             RETURNING {MATERIAL_COLUMNS}"
        );
        let created = with_retry(|| {
            sqlx::query_as::<_, Material>(&query)
                .bind(&material.title)
                .bind(material.category.as_str())
                .bind(&material.description)
                .bind(&material.content)
                .fetch_one(pool)
        })
        .await?;
        Ok(created)
    }

    pub async fn list_all(pool: &PgPool) -> Result<Vec<Material>, DatabaseError> {
        let query = format!("SELECT {MATERIAL_COLUMNS} FROM materials ORDER BY created_at DESC");
        let materials =
            with_retry(|| sqlx::query_as::<_, Material>(&query).fetch_all(pool)).await?;
        Ok(materials)
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Material>, DatabaseError> {
        let query = format!("SELECT {MATERIAL_COLUMNS} FROM materials WHERE id = $1");
        let material = with_retry(|| {
            sqlx::query_as::<_, Material>(&query)
                .bind(id)
                .fetch_optional(pool)
        })
        .await?;
        Ok(material)
    }

    pub async fn update(
        pool: &PgPool,
        id: i64,
        material: &ValidatedMaterial,
    ) -> Result<Option<Material>, DatabaseError> {
        let query = format!(
            "UPDATE materials
             SET title = $1, category = $2, description = $3, content = $4, updated_at = NOW()
             WHERE id = $5
             RETURNING {MATERIAL_COLUMNS}"
        );
        let updated = with_retry(|| {
            sqlx::query_as::<_, Material>(&query)
                .bind(&material.title)
                .bind(material.category.as_str())
                .bind(&material.description)
                .bind(&material.content)
                .bind(id)
                .fetch_optional(pool)
        })
        .await?;
        Ok(updated)
    }

    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, DatabaseError> {
        let result = with_retry(|| {
            sqlx::query("DELETE FROM materials WHERE id = $1")
                .bind(id)
                .execute(pool)
        })
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
