//! Summary repository: loads a user's rows and hands them to the
//! aggregation engine.

use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, DbErr};
use tally_core::aggregation::{AggregationService, CategorySummary, DashboardSummary, YearlySpending};
use tally_core::period::{Month, year_bounds};

use super::budget::BudgetRepository;
use super::category::CategoryRepository;
use super::transaction::TransactionRepository;

/// Repository producing the dashboard, annual trend and category summaries.
#[derive(Debug, Clone)]
pub struct SummaryRepository {
    transactions: TransactionRepository,
    categories: CategoryRepository,
    budgets: BudgetRepository,
}

impl SummaryRepository {
    /// Creates a new summary repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            transactions: TransactionRepository::new(db.clone()),
            categories: CategoryRepository::new(db.clone()),
            budgets: BudgetRepository::new(db),
        }
    }

    /// Dashboard for the month and year containing `as_of`.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn dashboard(&self, user_id: i32, as_of: NaiveDate) -> Result<DashboardSummary, DbErr> {
        let month = Month::of(as_of);
        let (start, end) = year_bounds(month.year);
        let year_rows = self.transactions.in_range(user_id, start, end).await?;
        let budgets = self.budgets.for_month(user_id, month).await?;
        let recent = self
            .transactions
            .recent(user_id, AggregationService::RECENT_LIMIT as u64)
            .await?;

        Ok(AggregationService::dashboard_summary(
            as_of, &year_rows, &budgets, recent,
        ))
    }

    /// Expenses per calendar year, ascending.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn annual_spending(&self, user_id: i32) -> Result<Vec<YearlySpending>, DbErr> {
        let expenses = self.transactions.expenses(user_id).await?;
        Ok(AggregationService::annual_spending_trend(&expenses))
    }

    /// Clamped totals for each of the user's categories.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn category_summary(&self, user_id: i32) -> Result<Vec<CategorySummary>, DbErr> {
        let categories: Vec<_> = self
            .categories
            .list(user_id)
            .await?
            .iter()
            .map(CategoryRepository::to_record)
            .collect();
        let transactions = self.transactions.all(user_id).await?;

        Ok(AggregationService::category_summary(&categories, &transactions))
    }
}
