use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::models::CurrentUser;
use crate::AppState;

/// Authentication middleware.
///
/// Extracts a bearer token from the request headers and, when it validates,
/// installs the resolved identity into the request extensions. A missing or
/// invalid token leaves the request unauthenticated; handlers that need an
/// identity reject through the `CurrentUser` extractor. No I/O here beyond
/// the in-memory revocation lookup.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(request.headers(), &state.config.auth.header) {
        if state.tokens.validate(&token) {
            match state.tokens.claims(&token) {
                Ok(claims) => match CurrentUser::from_claims(&claims) {
                    Some(current_user) => {
                        request.extensions_mut().insert(current_user);
                    }
                    None => tracing::warn!("Token id claim is not numeric: {}", claims.jti),
                },
                Err(e) => tracing::warn!("Claims unreadable on validated token: {:?}", e),
            }
        }
    }

    next.run(request).await
}

/// Locate a bearer token. `Authorization` wins when present; otherwise the
/// configured alternate header is consulted. The `Bearer ` prefix match is
/// case-sensitive.
pub fn bearer_token(headers: &HeaderMap, alt_header: &str) -> Option<String> {
    let value = match headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    {
        Some(primary) => Some(primary),
        None => headers.get(alt_header).and_then(|h| h.to_str().ok()),
    };

    value
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}
