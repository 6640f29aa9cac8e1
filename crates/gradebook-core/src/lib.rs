//! # Gradebook Core
//!
//! Foundational types shared by every Gradebook crate:
//!
//! - [`errors`]: [`AppError`], the error type returned by handlers and services
//! - [`pagination`]: page-based pagination parameters and metadata
//! - [`password`]: bcrypt password hashing and verification
//!
//! # Example
//!
//! ```ignore
//! use gradebook_core::{AppError, hash_password, verify_password};
//!
//! let hash = hash_password("password")?;
//! assert!(verify_password("password", &hash)?);
//!
//! let error = AppError::not_found(anyhow::anyhow!("Course not found"));
//! ```

pub mod errors;
pub mod pagination;
pub mod password;

pub use errors::{AppError, format_validation_errors};
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, hash_password_with_cost, verify_password};
