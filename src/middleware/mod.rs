//! Request authentication and authorization.
//!
//! - [`auth`]: the [`auth::AuthUser`] extractor validating bearer tokens
//! - [`role`]: area guards (`require_teacher`, `require_student`)
//! - [`voter`]: per-resource checks for courses and grades

pub mod auth;
pub mod role;
pub mod voter;
