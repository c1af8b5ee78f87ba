use async_trait::async_trait;

use crate::db::Database;
use crate::error::Result;
use crate::models::User;

use super::UserRepository;

/// Sqlite-backed user repository
#[derive(Clone)]
pub struct SqliteUserRepository {
    db: Database,
}

impl SqliteUserRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn find_by_login(&self, login: &str) -> Result<Option<User>> {
        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE login = ?")
            .bind(login)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(user)
    }
}
