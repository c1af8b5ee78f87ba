use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

use crate::error::{AppError, Result, UNATTRIBUTED};
use crate::messages::Messages;
use crate::models::{CurrentUser, LoginRequest, TokenResponse};
use crate::repository::UserRepository;
use crate::services::TokenService;

/// Authentication service
pub struct AuthService;

impl AuthService {
    /// Exchange credentials for a signed bearer token.
    pub async fn login(
        users: &dyn UserRepository,
        tokens: &TokenService,
        messages: &Messages,
        req: LoginRequest,
    ) -> Result<TokenResponse> {
        let user = users
            .find_by_login(&req.login)
            .await?
            .ok_or_else(|| AppError::NotFound {
                id: UNATTRIBUTED,
                message: messages.resolve("user.login.error"),
            })?;

        if !Self::verify_password(&req.password, &user.password_hash)? {
            tracing::warn!("Failed login for {}", user.login);
            return Err(AppError::InputData {
                id: user.id,
                message: messages.resolve("user.password.error"),
            });
        }

        let auth_token = tokens.issue(&user)?;
        tracing::info!("Issued token for {}", user.login);
        Ok(TokenResponse { auth_token })
    }

    /// Revoke the presented token for the authenticated user.
    pub async fn logout(
        users: &dyn UserRepository,
        tokens: &TokenService,
        user: &CurrentUser,
        token: &str,
    ) -> Result<()> {
        users
            .find_by_login(&user.login)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Unknown session user".to_string()))?;

        tokens.revoke(token);
        tracing::info!("Revoked token for {}", user.login);
        Ok(())
    }

    /// Hash a password using Argon2
    pub fn hash_password(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?
            .to_string();

        Ok(password_hash)
    }

    /// Verify a password against a stored hash
    fn verify_password(password: &str, hash: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}
