use std::collections::HashSet;

use anyhow::Context;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use parking_lot::RwLock;

use crate::config::JwtConfig;
use crate::error::Result;
use crate::models::{Claims, User};

/// Stateless token issuer and verifier.
///
/// The secret key is decoded from base64 once at construction and lives for
/// the whole process. The revocation set is the only mutable server-side
/// state: it holds literal token strings invalidated by logout and is never
/// pruned before process restart. Identity is never stored here; it travels
/// with each request.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_minutes: i64,
    revoked: RwLock<HashSet<String>>,
}

impl TokenService {
    pub fn new(config: &JwtConfig) -> anyhow::Result<Self> {
        let secret = STANDARD
            .decode(&config.secret)
            .context("jwt secret is not valid base64")?;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(&secret),
            decoding_key: DecodingKey::from_secret(&secret),
            ttl_minutes: config.expiration_minutes,
            revoked: RwLock::new(HashSet::new()),
        })
    }

    /// Issue a signed token for a resolved user identity.
    pub fn issue(&self, user: &User) -> Result<String> {
        let exp = Utc::now() + Duration::minutes(self.ttl_minutes);

        let claims = Claims {
            jti: user.id.to_string(),
            sub: user.login.clone(),
            exp: exp.timestamp() as usize,
            roles: user.roles(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Fail-closed validation: revoked, tampered, malformed and expired
    /// tokens are all invalid. Decode errors are logged, never propagated.
    pub fn validate(&self, token: &str) -> bool {
        if self.revoked.read().contains(token) {
            tracing::debug!("Rejected revoked token");
            return false;
        }

        match decode::<Claims>(token, &self.decoding_key, &Validation::default()) {
            Ok(_) => true,
            Err(e) => {
                use jsonwebtoken::errors::ErrorKind;
                match e.kind() {
                    ErrorKind::ExpiredSignature => tracing::warn!("Token expired"),
                    ErrorKind::InvalidSignature => tracing::warn!("Invalid token signature"),
                    _ => tracing::warn!("Invalid token: {:?}", e),
                }
                false
            }
        }
    }

    /// Extract claims from a token. Callers validate first, but a parse
    /// failure here still surfaces as a hard error rather than a panic.
    pub fn claims(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())?;
        Ok(data.claims)
    }

    /// Revoke a token by its literal string form; idempotent.
    pub fn revoke(&self, token: &str) {
        self.revoked.write().insert(token.to_string());
    }
}
