//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Every read-modify-write takes the acting user's ID and treats rows owned by
//! anyone else as missing.

pub mod budget;
pub mod category;
pub mod profile;
pub mod session;
pub mod summary;
pub mod transaction;
pub mod user;

pub use budget::{BudgetError, BudgetInput, BudgetRepository, UpsertedBudget};
pub use category::{CategoryError, CategoryInput, CategoryRepository};
pub use profile::{DEFAULT_CURRENCY, ProfileRepository};
pub use session::SessionRepository;
pub use summary::SummaryRepository;
pub use transaction::{TransactionError, TransactionInput, TransactionRepository, UNCATEGORIZED};
pub use user::{UserError, UserRepository};

use sea_orm::{DbErr, SqlErr};

/// Returns true when a write was refused by a unique index.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
