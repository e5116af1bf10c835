//! PostgreSQL persistence for the catalog.
//!
//! Repositories are zero-sized structs with async methods taking `&PgPool`.
//! Every read goes through [`soft_delete::SoftDeleteGuard`], and filtered
//! listings compile `cinecat_core::predicate` terms via [`filter`].

use sqlx::postgres::PgPoolOptions;

pub mod error;
pub mod filter;
pub mod models;
pub mod repositories;
pub mod soft_delete;

pub use error::{DbError, DbResult};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify the pool can reach the database.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
