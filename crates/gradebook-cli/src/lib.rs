//! # Gradebook CLI
//!
//! Database seeding utilities for Gradebook development and demos.
//!
//! ## Usage
//!
//! ```ignore
//! use gradebook_cli::seeder::{seed_all, SeedConfig};
//!
//! seed_all(&pool, SeedConfig::default()).await?;
//! ```

pub mod admin;
pub mod seeder;
