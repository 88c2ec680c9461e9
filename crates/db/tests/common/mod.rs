//! Shared setup for repository integration tests.

#![allow(dead_code)]

use sea_orm::{Database, DatabaseConnection};
use tally_db::UserRepository;
use tally_db::migration::{Migrator, MigratorTrait};

/// Fresh in-memory database with every migration applied.
pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// Registers a user (with starter categories) and returns its ID.
pub async fn create_test_user(db: &DatabaseConnection, email: &str) -> i32 {
    UserRepository::new(db.clone())
        .register(email, "$argon2id$test", "Test User")
        .await
        .expect("Failed to register test user")
        .id
}
