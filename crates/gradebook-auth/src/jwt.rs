//! Access token creation and verification.
//!
//! Tokens are HS256-signed with the secret from [`JwtConfig`] and carry the
//! user's id, email and role.
//!
//! # Example
//!
//! ```ignore
//! use gradebook_auth::{create_access_token, verify_token};
//! use gradebook_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(user_id, "teacher1@school.test", "teacher", &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.role, "teacher");
//! ```

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use gradebook_config::JwtConfig;
use gradebook_core::AppError;

use crate::claims::Claims;

pub fn create_access_token(
    user_id: Uuid,
    email: &str,
    role: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + jwt_config.access_token_expiry as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role: role.to_string(),
        exp,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create token: {}", e)))
}

/// Verifies signature and expiry, returning the embedded claims.
///
/// Any failure is reported as 401 without detail.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired token"))
}
