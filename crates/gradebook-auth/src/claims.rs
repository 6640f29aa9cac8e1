//! JWT claim structures.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims embedded in access tokens.
///
/// The role travels in the token so that route guards and voters can
/// decide without a database lookup.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    pub email: String,
    /// One of `admin`, `teacher`, `student`
    pub role: String,
    /// Expiration timestamp (Unix seconds)
    pub exp: usize,
    /// Issued-at timestamp (Unix seconds)
    pub iat: usize,
}
