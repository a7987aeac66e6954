//! JWT token service
//!
//! Validates (and, for tooling and tests, generates) HS256 tokens. Login and
//! session management live in the auth collaborator; this service only
//! establishes who the caller is and which permissions they carry.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::permissions::PERM_ALL;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Signing secret (at least 32 bytes in production)
    pub secret: String,
    /// Token lifetime in minutes
    pub expiration_minutes: i64,
    /// Issuer
    pub issuer: String,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, using development fallback key");
            "dev-only-secret-change-me-in-production".to_string()
        });

        Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "store-server".to_string()),
        }
    }
}

/// Claims carried in the token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID (subject)
    pub sub: String,
    /// Username (used as the actor label in audit trails)
    pub username: String,
    /// Role name
    pub role: String,
    /// Permission list (comma separated)
    pub permissions: String,
    /// Expiry timestamp (seconds)
    pub exp: i64,
    /// Issued-at timestamp (seconds)
    pub iat: i64,
    /// Issuer
    pub iss: String,
}

/// JWT errors
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token expired")]
    ExpiredToken,

    #[error("token generation failed: {0}")]
    GenerationFailed(String),
}

/// Authenticated caller context, decoded from validated claims
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
    pub role: String,
    pub permissions: Vec<String>,
}

impl CurrentUser {
    /// Check a single permission ("all" implies everything)
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == PERM_ALL || p == permission)
    }

    /// Require a permission, erroring with a caller-facing message
    pub fn require(&self, permission: &str) -> Result<(), crate::utils::AppError> {
        if self.has_permission(permission) {
            Ok(())
        } else {
            Err(crate::utils::AppError::forbidden(format!(
                "missing permission: {permission}"
            )))
        }
    }
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        let permissions = if claims.permissions.is_empty() {
            vec![]
        } else {
            claims
                .permissions
                .split(',')
                .map(|s| s.trim().to_string())
                .collect()
        };

        Self {
            id: claims.sub,
            username: claims.username,
            role: claims.role,
            permissions,
        }
    }
}

/// JWT token service
#[derive(Debug, Clone)]
pub struct JwtService {
    config: JwtConfig,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    /// Extract the bearer token from an Authorization header value
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }

    /// Generate a token for a user
    pub fn generate_token(
        &self,
        user_id: &str,
        username: &str,
        role: &str,
        permissions: &[String],
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            role: role.to_string(),
            permissions: permissions.join(","),
            exp: (now + Duration::minutes(self.config.expiration_minutes)).timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.secret.as_bytes()),
        )
        .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Validate a token and return its claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
            _ => JwtError::InvalidToken(e.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> JwtService {
        JwtService::new(JwtConfig {
            secret: "test-secret-at-least-32-bytes-long!!".to_string(),
            expiration_minutes: 60,
            issuer: "store-server".to_string(),
        })
    }

    #[test]
    fn test_generate_and_validate_roundtrip() {
        let svc = test_service();
        let token = svc
            .generate_token(
                "user:1",
                "admin",
                "admin",
                &["products:manage".to_string(), "orders:manage".to_string()],
            )
            .unwrap();

        let claims = svc.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "user:1");

        let user = CurrentUser::from(claims);
        assert!(user.has_permission("products:manage"));
        assert!(!user.has_permission("users:manage"));
    }

    #[test]
    fn test_all_permission_implies_everything() {
        let user = CurrentUser {
            id: "user:1".to_string(),
            username: "root".to_string(),
            role: "admin".to_string(),
            permissions: vec!["all".to_string()],
        };
        assert!(user.has_permission("orders:manage"));
        assert!(user.require("products:manage").is_ok());
    }

    #[test]
    fn test_require_denied() {
        let user = CurrentUser {
            id: "user:2".to_string(),
            username: "staff".to_string(),
            role: "user".to_string(),
            permissions: vec![],
        };
        assert!(user.require("orders:manage").is_err());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let svc = test_service();
        let token = svc.generate_token("user:1", "admin", "admin", &[]).unwrap();
        let tampered = format!("{}x", token);
        assert!(svc.validate_token(&tampered).is_err());
    }

    #[test]
    fn test_extract_from_header() {
        assert_eq!(JwtService::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
    }
}
