use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};

use crate::error::{AppError, Result};
use crate::middleware::auth::bearer_token;
use crate::models::{CurrentUser, LoginRequest, TokenResponse};
use crate::services::AuthService;
use crate::AppState;

/// Login
/// POST /login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    let response = AuthService::login(
        state.users.as_ref(),
        &state.tokens,
        &state.messages,
        req,
    )
    .await?;
    Ok(Json(response))
}

/// Logout: revokes the presented token
/// POST /logout
pub async fn logout(
    State(state): State<AppState>,
    current_user: CurrentUser,
    headers: HeaderMap,
) -> Result<StatusCode> {
    let token = bearer_token(&headers, &state.config.auth.header)
        .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;

    AuthService::logout(state.users.as_ref(), &state.tokens, &current_user, &token).await?;
    Ok(StatusCode::OK)
}
