use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// File record. The content hash is computed once at upload and never
/// recomputed on rename or resurrection.
#[derive(Debug, Clone, FromRow)]
pub struct File {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    /// Lowercase hex SHA-256 of the original payload
    pub hash: String,
    pub size: i64,
    pub content: Vec<u8>,
    pub mime_type: String,
    pub created_at: String,
    pub updated_at: String,
    /// Soft-delete tombstone flag
    pub is_deleted: bool,
}

/// Transfer representation returned by the list operation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    #[serde(rename = "filename")]
    pub file_name: String,
    pub hash: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub date: String,
    pub size: i64,
    #[serde(with = "base64_bytes")]
    pub file_bytes: Vec<u8>,
}

impl From<File> for FileSummary {
    fn from(file: File) -> Self {
        Self {
            file_name: file.name,
            hash: file.hash,
            mime_type: file.mime_type,
            date: file.updated_at,
            size: file.size,
            file_bytes: file.content,
        }
    }
}

/// Download result: name, media type and the raw payload
#[derive(Debug, Clone)]
pub struct DownloadedFile {
    pub file_name: String,
    pub mime_type: String,
    pub content: Vec<u8>,
}

/// Rename request body
#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    #[serde(rename = "filename")]
    pub file_name: String,
}

/// Query parameter for the file operations
#[derive(Debug, Deserialize)]
pub struct FilenameQuery {
    pub filename: String,
}

/// Query parameter for the list operation
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: i64,
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}
