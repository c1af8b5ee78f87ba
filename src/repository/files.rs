use async_trait::async_trait;

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::File;

use super::FileRepository;

/// Sqlite-backed file repository
#[derive(Clone)]
pub struct SqliteFileRepository {
    db: Database,
}

impl SqliteFileRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FileRepository for SqliteFileRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<File>> {
        let file: Option<File> = sqlx::query_as("SELECT * FROM files WHERE name = ?")
            .bind(name)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(file)
    }

    async fn find_by_owner(&self, owner_id: i64, limit: i64) -> Result<Vec<File>> {
        let files: Vec<File> =
            sqlx::query_as("SELECT * FROM files WHERE user_id = ? ORDER BY name ASC LIMIT ?")
                .bind(owner_id)
                .bind(limit)
                .fetch_all(self.db.pool())
                .await?;

        Ok(files)
    }

    async fn save(&self, file: &File) -> Result<File> {
        let saved: File = if file.id == 0 {
            sqlx::query_as(
                r#"
                INSERT INTO files (user_id, name, hash, size, content, mime_type, created_at, updated_at, is_deleted)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                RETURNING *
                "#,
            )
            .bind(file.user_id)
            .bind(&file.name)
            .bind(&file.hash)
            .bind(file.size)
            .bind(&file.content)
            .bind(&file.mime_type)
            .bind(&file.created_at)
            .bind(&file.updated_at)
            .bind(file.is_deleted)
            .fetch_one(self.db.pool())
            .await?
        } else {
            sqlx::query_as(
                r#"
                UPDATE files
                SET name = ?, hash = ?, size = ?, content = ?, mime_type = ?, updated_at = ?, is_deleted = ?
                WHERE id = ?
                RETURNING *
                "#,
            )
            .bind(&file.name)
            .bind(&file.hash)
            .bind(file.size)
            .bind(&file.content)
            .bind(&file.mime_type)
            .bind(&file.updated_at)
            .bind(file.is_deleted)
            .bind(file.id)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or_else(|| AppError::Internal(format!("No file row with id {}", file.id)))?
        };

        Ok(saved)
    }
}
