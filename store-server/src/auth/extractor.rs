//! JWT extractor
//!
//! Custom extractor that validates the bearer token and yields the caller
//! context. Handlers that take a [`CurrentUser`] parameter are authenticated
//! automatically.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::utils::AppError;

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Reuse if a middleware already extracted the user
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let token = match auth_header {
            Some(header) => JwtService::extract_from_header(header)
                .ok_or(AppError::InvalidToken)?,
            None => {
                tracing::warn!(uri = %parts.uri, "request without authorization header");
                return Err(AppError::unauthorized());
            }
        };

        match state.jwt_service.validate_token(token) {
            Ok(claims) => {
                let user = CurrentUser::from(claims);
                parts.extensions.insert(user.clone());
                Ok(user)
            }
            Err(JwtError::ExpiredToken) => Err(AppError::TokenExpired),
            Err(e) => {
                tracing::warn!(uri = %parts.uri, error = %e, "token validation failed");
                Err(AppError::InvalidToken)
            }
        }
    }
}
