pub mod files;
pub mod users;

pub use files::SqliteFileRepository;
pub use users::SqliteUserRepository;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{File, User};

/// Durable storage of file records.
///
/// Name lookup is exact, case-sensitive and repository-wide, not
/// owner-scoped. See DESIGN.md before changing that.
#[async_trait]
pub trait FileRepository: Send + Sync {
    async fn find_by_name(&self, name: &str) -> Result<Option<File>>;

    /// Files belonging to `owner_id`, ascending by name, capped at `limit`.
    async fn find_by_owner(&self, owner_id: i64, limit: i64) -> Result<Vec<File>>;

    /// Upsert by identity: inserts when `file.id == 0`, updates otherwise.
    /// Returns the persisted record.
    async fn save(&self, file: &File) -> Result<File>;
}

/// User records: consulted, never mutated, by authentication.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_login(&self, login: &str) -> Result<Option<User>>;
}
