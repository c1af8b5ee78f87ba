use chrono::Utc;
use sha2::{Digest, Sha256};

use crate::error::{AppError, Result, UNATTRIBUTED};
use crate::messages::Messages;
use crate::models::{CurrentUser, DownloadedFile, File, FileSummary, RenameRequest};
use crate::repository::FileRepository;

/// Read-buffer size for streaming the upload payload through the digest.
const HASH_BUF_SIZE: usize = 8 * 1024;

const DEFAULT_MIME: &str = "application/octet-stream";

/// File-store service: upload, download, rename, soft-delete and listing,
/// scoped to the identity resolved for the current request.
///
/// Per file name the lifecycle is ABSENT -> PRESENT -> DELETED ->
/// PRESENT (resurrected) -> ... A tombstoned name that is re-uploaded is
/// resurrected: the deleted flag clears but hash and payload stay those of
/// the original upload.
pub struct CloudService;

impl CloudService {
    /// Upload a file. Empty payloads are rejected before the acting
    /// identity is consulted, so that failure carries the sentinel id.
    pub async fn upload(
        files: &dyn FileRepository,
        messages: &Messages,
        user: &CurrentUser,
        file_name: &str,
        mime_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<()> {
        if bytes.is_empty() {
            tracing::error!("File not attached: {}", file_name);
            return Err(AppError::InputData {
                id: UNATTRIBUTED,
                message: messages.resolve("file.upload.error"),
            });
        }

        match files.find_by_name(file_name).await? {
            Some(mut existing) if existing.is_deleted => {
                // Resurrection, not overwrite: hash and payload keep the
                // original upload's values.
                existing.is_deleted = false;
                existing.updated_at = Utc::now().to_rfc3339();
                files.save(&existing).await?;
                tracing::info!("File {} was tombstoned, cleared deleted flag", file_name);
            }
            Some(_) => {
                tracing::error!("File with name {} already exists", file_name);
                return Err(AppError::InputData {
                    id: user.id,
                    message: messages.resolve("file.uploaded.error"),
                });
            }
            None => {
                let hash = Self::content_hash(bytes);
                let now = Utc::now().to_rfc3339();
                let file = File {
                    id: 0,
                    user_id: user.id,
                    name: file_name.to_string(),
                    hash,
                    size: bytes.len() as i64,
                    content: bytes.to_vec(),
                    mime_type: mime_type.unwrap_or(DEFAULT_MIME).to_string(),
                    created_at: now.clone(),
                    updated_at: now,
                    is_deleted: false,
                };
                files.save(&file).await?;
                tracing::info!("File {} created and saved to storage", file_name);
            }
        }

        Ok(())
    }

    /// Soft-delete: sets the tombstone flag and refreshes the modification
    /// timestamp; payload and hash stay in place.
    pub async fn delete(
        files: &dyn FileRepository,
        messages: &Messages,
        user: &CurrentUser,
        file_name: &str,
    ) -> Result<()> {
        let mut file = Self::get_by_name(files, messages, file_name, user.id).await?;
        file.is_deleted = true;
        file.updated_at = Utc::now().to_rfc3339();

        tracing::info!(
            "Set deleted flag on file {} for user {}",
            file.name,
            user.id
        );
        files.save(&file).await?;
        Ok(())
    }

    /// Download by exact name. The deleted flag is deliberately not
    /// checked: a tombstoned file stays fetchable by name.
    pub async fn download(
        files: &dyn FileRepository,
        messages: &Messages,
        user: &CurrentUser,
        file_name: &str,
    ) -> Result<DownloadedFile> {
        let file = Self::get_by_name(files, messages, file_name, user.id).await?;

        tracing::info!("Download file: {}", file_name);
        Ok(DownloadedFile {
            file_name: file.name,
            mime_type: file.mime_type,
            content: file.content,
        })
    }

    /// Rename. The target name must be unused by any record, deleted or
    /// not; hash and payload are untouched.
    pub async fn rename(
        files: &dyn FileRepository,
        messages: &Messages,
        user: &CurrentUser,
        file_name: &str,
        req: &RenameRequest,
    ) -> Result<()> {
        if files.find_by_name(&req.file_name).await?.is_some() {
            tracing::error!("File with name {} already exists", req.file_name);
            return Err(AppError::InputData {
                id: user.id,
                message: messages.resolve("file.uploaded.error"),
            });
        }

        let mut file = Self::get_by_name(files, messages, file_name, user.id).await?;
        file.name = req.file_name.clone();

        tracing::info!("Renamed file {} to {}", file_name, req.file_name);
        files.save(&file).await?;
        Ok(())
    }

    /// Up to `limit` of the user's files, name-ascending, tombstones
    /// filtered out after the repository applies the cap.
    pub async fn list(
        files: &dyn FileRepository,
        messages: &Messages,
        user: &CurrentUser,
        limit: i64,
    ) -> Result<Vec<FileSummary>> {
        if limit < 0 {
            return Err(AppError::InputData {
                id: user.id,
                message: messages.resolve("list.limit.error"),
            });
        }

        let rows = files.find_by_owner(user.id, limit).await?;
        Ok(rows
            .into_iter()
            .filter(|f| !f.is_deleted)
            .map(FileSummary::from)
            .collect())
    }

    /// Lowercase hex SHA-256, streamed through a fixed-size buffer.
    fn content_hash(bytes: &[u8]) -> String {
        let mut hasher = Sha256::new();
        for chunk in bytes.chunks(HASH_BUF_SIZE) {
            hasher.update(chunk);
        }
        hex::encode(hasher.finalize())
    }

    async fn get_by_name(
        files: &dyn FileRepository,
        messages: &Messages,
        file_name: &str,
        user_id: i64,
    ) -> Result<File> {
        files
            .find_by_name(file_name)
            .await?
            .ok_or_else(|| AppError::NotFound {
                id: user_id,
                message: messages.resolve("file.exist.error"),
            })
    }
}
