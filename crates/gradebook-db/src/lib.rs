//! # Gradebook DB
//!
//! PostgreSQL connection pool and embedded migrations.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
//!
//! # Example
//!
//! ```ignore
//! use gradebook_db::{init_db_pool, run_migrations};
//!
//! let pool = init_db_pool().await?;
//! run_migrations(&pool).await?;
//! ```

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::env;

pub use sqlx::PgPool;

/// Connects to the database named by `DATABASE_URL`.
pub async fn init_db_pool() -> anyhow::Result<PgPool> {
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(10);

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!(max_connections, "Database pool initialized");

    Ok(pool)
}

/// Applies the migrations under `migrations/` at the workspace root.
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database migrations applied");

    Ok(())
}
