//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations (portable across PostgreSQL and SQLite)

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    BudgetRepository, CategoryRepository, ProfileRepository, SessionRepository,
    SummaryRepository, TransactionRepository, UserRepository,
};

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a connection pool to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(
    database_url: &str,
    max_connections: u32,
    min_connections: u32,
) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .max_connections(max_connections)
        .min_connections(min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    tracing::debug!(max_connections, min_connections, "connecting to database");
    Database::connect(options).await
}
