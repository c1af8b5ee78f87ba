use axum::{
    extract::{Multipart, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::error::{AppError, Result};
use crate::models::{CurrentUser, FileSummary, FilenameQuery, ListQuery, RenameRequest, Role};
use crate::services::CloudService;
use crate::AppState;

/// Upload a file
/// POST /cloud/file?filename=<name>, multipart part "file"
pub async fn upload_file(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<FilenameQuery>,
    mut multipart: Multipart,
) -> Result<StatusCode> {
    current_user.require(Role::User)?;

    let mut content_type = None;
    let mut bytes = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to process multipart: {}", e)))?
    {
        if field.name() == Some("file") {
            content_type = field.content_type().map(|s| s.to_string());
            bytes = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read file part: {}", e)))?,
            );
        }
    }

    // a missing part is treated like an empty payload
    let bytes = bytes.unwrap_or_default();

    CloudService::upload(
        state.files.as_ref(),
        &state.messages,
        &current_user,
        &query.filename,
        content_type.as_deref(),
        &bytes,
    )
    .await?;
    Ok(StatusCode::OK)
}

/// Download a file
/// GET /cloud/file?filename=<name>
pub async fn download_file(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<FilenameQuery>,
) -> Result<Response> {
    current_user.require(Role::User)?;

    let file = CloudService::download(
        state.files.as_ref(),
        &state.messages,
        &current_user,
        &query.filename,
    )
    .await?;

    let headers = [
        (header::CONTENT_TYPE, file.mime_type.clone()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file.file_name),
        ),
    ];
    Ok((headers, file.content).into_response())
}

/// Rename a file
/// PUT /cloud/file?filename=<name>
pub async fn rename_file(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<FilenameQuery>,
    Json(req): Json<RenameRequest>,
) -> Result<StatusCode> {
    current_user.require(Role::User)?;

    CloudService::rename(
        state.files.as_ref(),
        &state.messages,
        &current_user,
        &query.filename,
        &req,
    )
    .await?;
    Ok(StatusCode::OK)
}

/// Soft-delete a file
/// DELETE /cloud/file?filename=<name>
pub async fn delete_file(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<FilenameQuery>,
) -> Result<StatusCode> {
    current_user.require(Role::User)?;

    CloudService::delete(
        state.files.as_ref(),
        &state.messages,
        &current_user,
        &query.filename,
    )
    .await?;
    Ok(StatusCode::OK)
}

/// List the current user's files
/// GET /cloud/list?limit=<n>
pub async fn list_files(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<FileSummary>>> {
    current_user.require(Role::User)?;

    let files = CloudService::list(
        state.files.as_ref(),
        &state.messages,
        &current_user,
        query.limit,
    )
    .await?;
    Ok(Json(files))
}
