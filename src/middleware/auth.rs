use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use gradebook_auth::{Claims, verify_token};
use gradebook_core::AppError;
use gradebook_models::{UserId, UserRole};

use crate::state::AppState;

/// Extractor that validates the bearer JWT and exposes its claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> Result<UserId, AppError> {
        self.0
            .sub
            .parse()
            .map_err(|_| AppError::unauthorized("Invalid user ID in token"))
    }

    pub fn role(&self) -> Result<UserRole, AppError> {
        self.0
            .role
            .parse()
            .map_err(|_| AppError::unauthorized("Invalid role in token"))
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }

    pub fn is_admin(&self) -> bool {
        self.0.role == UserRole::Admin.as_str()
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Already verified by a role guard on this route
        if let Some(auth_user) = parts.extensions.get::<AuthUser>() {
            return Ok(auth_user.clone());
        }

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))?;

        let claims = verify_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}
