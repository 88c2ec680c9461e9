//! `SeaORM` entity definitions.

pub mod prelude;

pub mod budgets;
pub mod categories;
pub mod profiles;
pub mod sessions;
pub mod transactions;
pub mod users;
