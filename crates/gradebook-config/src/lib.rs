//! # Gradebook Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: token signing secret and lifetime
//! - [`cors`]: allowed browser origins
//! - [`server`]: bind address of the HTTP server
//! - [`report`]: values printed on generated PDF reports
//!
//! Every struct exposes `from_env()`, falling back to development defaults
//! when a variable is missing or unparsable.

pub mod cors;
pub mod jwt;
pub mod report;
pub mod server;

pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use report::ReportConfig;
pub use server::ServerConfig;
