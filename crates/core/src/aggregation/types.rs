//! Aggregation input and output types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::category::CategoryType;

/// A transaction as seen by the aggregation engine and returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Transaction ID.
    pub id: i32,
    /// Calendar date of the movement.
    pub date: NaiveDate,
    /// Free-text description.
    pub description: Option<String>,
    /// Category name (legacy label, kept in sync with the linked category).
    pub category: String,
    /// Linked category, if any.
    pub category_id: Option<i32>,
    /// Signed amount; negative is an expense.
    pub amount: Decimal,
}

impl TransactionRecord {
    /// Returns true for money going out.
    #[must_use]
    pub fn is_expense(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }
}

/// A budget row reduced to what the dashboard needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetRecord {
    /// First day of the budgeted month.
    pub month: NaiveDate,
    /// Planned amount.
    pub amount: Decimal,
}

/// A category reduced to what the category summary needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRecord {
    /// Category ID.
    pub id: i32,
    /// Category name.
    pub name: String,
    /// Expense or income.
    pub kind: CategoryType,
    /// Display color.
    pub color: String,
}

/// Dashboard numbers for the reference month and year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Expenses in the reference month, as a positive amount.
    pub monthly_spending: Decimal,
    /// Sum of budgets set for the reference month.
    pub monthly_budget: Decimal,
    /// Expenses in the reference year, as a positive amount.
    pub yearly_spending: Decimal,
    /// Most recent transactions, newest first.
    pub recent_transactions: Vec<TransactionRecord>,
}

/// Total expenses for one calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlySpending {
    /// Calendar year.
    pub year: i32,
    /// Expenses as a positive amount.
    pub total: Decimal,
}

/// Clamped total for one category, keyed by the category's direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryTotal {
    /// Expense categories report how much went out.
    #[serde(rename = "total_spent")]
    Spent(Decimal),
    /// Income categories report how much came in.
    #[serde(rename = "total_earned")]
    Earned(Decimal),
}

impl CategoryTotal {
    /// The amount regardless of direction.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        match self {
            Self::Spent(amount) | Self::Earned(amount) => *amount,
        }
    }
}

/// One entry of the category summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    /// Category ID.
    pub id: i32,
    /// Category name.
    pub name: String,
    /// Expense or income.
    #[serde(rename = "type")]
    pub kind: CategoryType,
    /// Display color.
    pub color: String,
    /// `total_spent` or `total_earned`.
    #[serde(flatten)]
    pub total: CategoryTotal,
}
