//! # Gradebook Auth
//!
//! JWT claims ([`Claims`]) and helpers to issue and verify access tokens.

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
