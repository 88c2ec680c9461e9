//! Aggregation service.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use super::types::{
    BudgetRecord, CategoryRecord, CategorySummary, CategoryTotal, DashboardSummary,
    TransactionRecord, YearlySpending,
};
use crate::category::CategoryType;
use crate::money;
use crate::period::Month;

/// Service computing the dashboard, annual trend and category summaries.
pub struct AggregationService;

impl AggregationService {
    /// Number of transactions shown on the dashboard.
    pub const RECENT_LIMIT: usize = 5;

    /// Builds the dashboard for the month and year containing `as_of`.
    ///
    /// `transactions` may cover any range; only rows in the reference year
    /// contribute. `recent` is sorted newest first (date, then id) and cut to
    /// [`Self::RECENT_LIMIT`].
    #[must_use]
    pub fn dashboard_summary(
        as_of: NaiveDate,
        transactions: &[TransactionRecord],
        budgets: &[BudgetRecord],
        recent: Vec<TransactionRecord>,
    ) -> DashboardSummary {
        let month = Month::of(as_of);

        let mut monthly = Decimal::ZERO;
        let mut yearly = Decimal::ZERO;
        for tx in transactions.iter().filter(|tx| tx.is_expense()) {
            if tx.date.year() != month.year {
                continue;
            }
            yearly += tx.amount;
            if month.contains(tx.date) {
                monthly += tx.amount;
            }
        }

        let monthly_budget: Decimal = budgets
            .iter()
            .filter(|b| month.contains(b.month))
            .map(|b| b.amount)
            .sum();

        DashboardSummary {
            monthly_spending: money::round(monthly.abs()),
            monthly_budget: money::round(monthly_budget),
            yearly_spending: money::round(yearly.abs()),
            recent_transactions: Self::most_recent(recent),
        }
    }

    /// Expenses per calendar year, ascending, one row per year with expenses.
    #[must_use]
    pub fn annual_spending_trend(transactions: &[TransactionRecord]) -> Vec<YearlySpending> {
        let mut by_year: BTreeMap<i32, Decimal> = BTreeMap::new();
        for tx in transactions.iter().filter(|tx| tx.is_expense()) {
            *by_year.entry(tx.date.year()).or_default() += tx.amount;
        }

        by_year
            .into_iter()
            .map(|(year, sum)| YearlySpending {
                year,
                total: money::round(sum.abs()),
            })
            .collect()
    }

    /// One clamped total per category, in id order.
    ///
    /// A transaction belongs to a category through `category_id`; rows without
    /// a link fall back to matching the category name exactly.
    #[must_use]
    pub fn category_summary(
        categories: &[CategoryRecord],
        transactions: &[TransactionRecord],
    ) -> Vec<CategorySummary> {
        let mut linked: HashMap<i32, Decimal> = HashMap::new();
        let mut by_name: HashMap<&str, Decimal> = HashMap::new();
        for tx in transactions {
            match tx.category_id {
                Some(id) => *linked.entry(id).or_default() += tx.amount,
                None => *by_name.entry(tx.category.as_str()).or_default() += tx.amount,
            }
        }

        let mut ordered: Vec<&CategoryRecord> = categories.iter().collect();
        ordered.sort_by_key(|c| c.id);

        ordered
            .into_iter()
            .map(|category| {
                let sum = linked.get(&category.id).copied().unwrap_or_default()
                    + by_name
                        .get(category.name.as_str())
                        .copied()
                        .unwrap_or_default();

                CategorySummary {
                    id: category.id,
                    name: category.name.clone(),
                    kind: category.kind,
                    color: category.color.clone(),
                    total: Self::clamp(category.kind, sum),
                }
            })
            .collect()
    }

    fn clamp(kind: CategoryType, sum: Decimal) -> CategoryTotal {
        match kind {
            CategoryType::Income => CategoryTotal::Earned(money::round(sum.max(Decimal::ZERO))),
            CategoryType::Expense => {
                CategoryTotal::Spent(money::round(sum.min(Decimal::ZERO).abs()))
            }
        }
    }

    fn most_recent(mut transactions: Vec<TransactionRecord>) -> Vec<TransactionRecord> {
        transactions.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
        transactions.truncate(Self::RECENT_LIMIT);
        transactions
    }
}
