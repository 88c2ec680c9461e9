//! Database seeder for Tally development and testing.
//!
//! Creates a demo account (with the starter categories), a few months of
//! transactions and a budget per expense category for the current month.
//! Running it twice leaves the existing demo account untouched.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use tally_core::auth::hash_password;
use tally_core::category::CategoryType;
use tally_db::repositories::{BudgetInput, TransactionInput};
use tally_db::{BudgetRepository, CategoryRepository, TransactionRepository, UserRepository};

const DEMO_EMAIL: &str = "demo@tally.dev";
const DEMO_PASSWORD: &str = "demo-password-1";

/// (days ago, amount in cents, category, description)
const SAMPLE_TRANSACTIONS: [(i64, i64, &str, &str); 10] = [
    (1, -1_850, "Food", "Groceries"),
    (3, -4_200, "Transportation", "Fuel"),
    (5, 350_000, "Income", "Salary"),
    (8, -2_499, "Entertainment", "Concert tickets"),
    (12, -9_800, "Utilities", "Electricity"),
    (20, -1_275, "Food", "Lunch"),
    (35, 350_000, "Income", "Salary"),
    (40, -6_300, "Utilities", "Internet"),
    (47, -3_150, "Food", "Dinner out"),
    (400, -12_000, "Entertainment", "Festival pass"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = tally_db::connect(&database_url, 1, 1).await?;

    let users = UserRepository::new(db.clone());
    if users.find_by_email(DEMO_EMAIL).await?.is_some() {
        println!("  Demo user already exists, skipping...");
        return Ok(());
    }

    println!("Seeding demo user...");
    let password_hash = hash_password(DEMO_PASSWORD)?;
    let user = users.register(DEMO_EMAIL, &password_hash, "Demo User").await?;

    println!("Seeding transactions...");
    let today = Utc::now().date_naive();
    let transactions = TransactionRepository::new(db.clone());
    for (days_ago, cents, category, description) in SAMPLE_TRANSACTIONS {
        transactions
            .create(
                user.id,
                TransactionInput {
                    date: today - Duration::days(days_ago),
                    amount: Decimal::new(cents, 2),
                    description: Some(description.to_string()),
                    category: Some(category.to_string()),
                    category_id: None,
                },
            )
            .await?;
    }

    println!("Seeding budgets...");
    let budgets = BudgetRepository::new(db.clone());
    for category in CategoryRepository::new(db.clone()).list(user.id).await? {
        if CategoryRepository::kind_of(&category) != CategoryType::Expense {
            continue;
        }
        budgets
            .upsert(
                user.id,
                BudgetInput {
                    category_id: category.id,
                    amount: Decimal::new(25_000, 2),
                    month: today,
                },
            )
            .await?;
    }

    println!("Seeding complete! Log in as {DEMO_EMAIL} / {DEMO_PASSWORD}");
    Ok(())
}
