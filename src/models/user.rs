use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User role tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }

    pub fn from_tag(s: &str) -> Option<Self> {
        match s.trim() {
            "USER" => Some(Role::User),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Authority string granted by this role.
    pub fn authority(&self) -> &'static str {
        match self {
            Role::User => "ROLE_USER",
            Role::Admin => "ROLE_ADMIN",
        }
    }
}

/// User model
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub login: String,
    pub password_hash: String,
    /// Comma-separated role tags, e.g. "USER,ADMIN"
    pub roles: String,
    pub created_at: String,
}

impl User {
    pub fn roles(&self) -> Vec<Role> {
        self.roles.split(',').filter_map(Role::from_tag).collect()
    }
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

/// Login response carrying the issued bearer token
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(rename = "auth-token")]
    pub auth_token: String,
}

/// JWT claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id as a string
    pub jti: String,
    /// Login
    pub sub: String,
    /// Unix-epoch expiry
    pub exp: usize,
    pub roles: Vec<Role>,
}

/// Current authenticated user, resolved per request from a validated token
/// and carried in the request extensions. Never process-wide state.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub login: String,
    pub roles: Vec<Role>,
}

impl CurrentUser {
    /// Build identity from validated claims. None when the id claim is not
    /// numeric, in which case the request stays unauthenticated.
    pub fn from_claims(claims: &Claims) -> Option<Self> {
        let id = claims.jti.parse().ok()?;
        Some(Self {
            id,
            login: claims.sub.clone(),
            roles: claims.roles.clone(),
        })
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Access-control gate used by the file-store handlers.
    pub fn require(&self, role: Role) -> crate::error::Result<()> {
        if self.has_role(role) {
            Ok(())
        } else {
            Err(crate::error::AppError::Forbidden(format!(
                "Requires authority {}",
                role.authority()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_authority_mapping() {
        assert_eq!(Role::User.authority(), "ROLE_USER");
        assert_eq!(Role::Admin.authority(), "ROLE_ADMIN");
    }

    #[test]
    fn parses_role_list() {
        let user = User {
            id: 1,
            login: "u1".into(),
            password_hash: String::new(),
            roles: "USER, ADMIN,UNKNOWN".into(),
            created_at: String::new(),
        };
        assert_eq!(user.roles(), vec![Role::User, Role::Admin]);
    }

    #[test]
    fn current_user_rejects_non_numeric_id() {
        let claims = Claims {
            jti: "not-a-number".into(),
            sub: "u1".into(),
            exp: 0,
            roles: vec![Role::User],
        };
        assert!(CurrentUser::from_claims(&claims).is_none());
    }
}
