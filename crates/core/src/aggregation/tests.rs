//! Property and example tests for the aggregation engine.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::service::AggregationService;
use super::types::{BudgetRecord, CategoryRecord, CategoryTotal, TransactionRecord};
use crate::category::CategoryType;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn tx(id: i32, date: NaiveDate, category: &str, category_id: Option<i32>, amount: Decimal) -> TransactionRecord {
    TransactionRecord {
        id,
        date,
        description: None,
        category: category.to_string(),
        category_id,
        amount,
    }
}

fn category(id: i32, name: &str, kind: CategoryType) -> CategoryRecord {
    CategoryRecord {
        id,
        name: name.to_string(),
        kind,
        color: "#000000".to_string(),
    }
}

fn march_fixture() -> (Vec<CategoryRecord>, Vec<TransactionRecord>) {
    let categories = vec![
        category(1, "Food", CategoryType::Expense),
        category(2, "Income", CategoryType::Income),
    ];
    let transactions = vec![
        tx(1, d(2024, 3, 5), "Food", Some(1), dec!(-50.00)),
        tx(2, d(2024, 3, 20), "Food", Some(1), dec!(-20.00)),
        tx(3, d(2024, 3, 1), "Income", Some(2), dec!(1000.00)),
    ];
    (categories, transactions)
}

#[test]
fn test_march_category_summary() {
    let (categories, transactions) = march_fixture();

    let summary = AggregationService::category_summary(&categories, &transactions);

    assert_eq!(summary.len(), 2);
    assert_eq!(summary[0].name, "Food");
    assert_eq!(summary[0].total, CategoryTotal::Spent(dec!(70.00)));
    assert_eq!(summary[1].name, "Income");
    assert_eq!(summary[1].total, CategoryTotal::Earned(dec!(1000.00)));
}

#[test]
fn test_march_dashboard() {
    let (_, transactions) = march_fixture();

    let summary = AggregationService::dashboard_summary(
        d(2024, 3, 31),
        &transactions,
        &[],
        transactions.clone(),
    );

    assert_eq!(summary.monthly_spending.to_string(), "70.00");
    assert_eq!(summary.yearly_spending.to_string(), "70.00");
    assert_eq!(summary.monthly_budget.to_string(), "0.00");
    let ids: Vec<i32> = summary.recent_transactions.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![2, 1, 3]);
}

#[test]
fn test_dashboard_serializes_camel_case() {
    let summary = AggregationService::dashboard_summary(d(2024, 1, 1), &[], &[], Vec::new());
    let json = serde_json::to_value(&summary).unwrap();

    assert_eq!(json["monthlySpending"], "0.00");
    assert_eq!(json["monthlyBudget"], "0.00");
    assert_eq!(json["yearlySpending"], "0.00");
    assert_eq!(json["recentTransactions"], serde_json::json!([]));
}

#[test]
fn test_category_summary_serializes_direction_key() {
    let (categories, transactions) = march_fixture();
    let summary = AggregationService::category_summary(&categories, &transactions);
    let json = serde_json::to_value(&summary).unwrap();

    assert_eq!(json[0]["type"], "expense");
    assert_eq!(json[0]["total_spent"], "70.00");
    assert!(json[0].get("total_earned").is_none());
    assert_eq!(json[1]["type"], "income");
    assert_eq!(json[1]["total_earned"], "1000.00");
}

#[test]
fn test_recent_transactions_limit_and_tie_break() {
    let same_day = d(2024, 5, 1);
    let recent: Vec<_> = (1..=7)
        .map(|id| tx(id, same_day, "N/A", None, dec!(-1)))
        .collect();

    let summary = AggregationService::dashboard_summary(same_day, &recent, &[], recent.clone());

    let ids: Vec<i32> = summary.recent_transactions.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![7, 6, 5, 4, 3]);
}

#[rstest]
#[case(d(2024, 3, 15), dec!(300.00))]
#[case(d(2024, 4, 2), dec!(50.00))]
#[case(d(2024, 5, 2), dec!(0))]
#[case(d(2023, 3, 15), dec!(0))]
fn test_monthly_budget_only_counts_reference_month(#[case] as_of: NaiveDate, #[case] expected: Decimal) {
    let budgets = [
        BudgetRecord { month: d(2024, 3, 1), amount: dec!(200) },
        BudgetRecord { month: d(2024, 3, 1), amount: dec!(100) },
        BudgetRecord { month: d(2024, 4, 1), amount: dec!(50) },
    ];

    let summary = AggregationService::dashboard_summary(as_of, &[], &budgets, Vec::new());

    assert_eq!(summary.monthly_budget, expected);
    assert_eq!(summary.monthly_budget.scale(), 2);
}

#[test]
fn test_legacy_rows_match_by_name() {
    let categories = vec![category(4, "Books", CategoryType::Expense)];
    let transactions = vec![
        tx(1, d(2024, 1, 1), "Books", None, dec!(-12.50)),
        tx(2, d(2024, 1, 2), "Books", Some(9), dec!(-99.00)),
        tx(3, d(2024, 1, 3), "N/A", Some(4), dec!(-7.50)),
    ];

    let summary = AggregationService::category_summary(&categories, &transactions);

    assert_eq!(summary[0].total, CategoryTotal::Spent(dec!(20.00)));
}

#[test]
fn test_category_without_transactions_reports_zero() {
    let categories = vec![
        category(2, "Income", CategoryType::Income),
        category(1, "Food", CategoryType::Expense),
    ];

    let summary = AggregationService::category_summary(&categories, &[]);

    assert_eq!(summary[0].id, 1);
    assert_eq!(summary[0].total.amount().to_string(), "0.00");
    assert_eq!(summary[1].total.amount().to_string(), "0.00");
}

#[test]
fn test_annual_trend_skips_income_only_years() {
    let transactions = vec![
        tx(1, d(2022, 6, 1), "Food", None, dec!(-10)),
        tx(2, d(2023, 6, 1), "Income", None, dec!(500)),
        tx(3, d(2024, 1, 1), "Food", None, dec!(-5.25)),
        tx(4, d(2024, 12, 31), "Food", None, dec!(-4.75)),
    ];

    let trend = AggregationService::annual_spending_trend(&transactions);

    let rows: Vec<(i32, String)> = trend.iter().map(|r| (r.year, r.total.to_string())).collect();
    assert_eq!(rows, vec![(2022, "10.00".to_string()), (2024, "10.00".to_string())]);
}

fn arb_transaction() -> impl Strategy<Value = TransactionRecord> {
    (
        1i32..10_000,
        2015i32..2030,
        1u32..=12,
        1u32..=28,
        -100_000i64..100_000,
        prop::option::of(1i32..6),
        prop::sample::select(vec!["Food", "Income", "Rent", "N/A"]),
    )
        .prop_map(|(id, y, m, day, cents, category_id, name)| {
            tx(id, d(y, m, day), name, category_id, Decimal::new(cents, 2))
        })
}

fn arb_categories() -> impl Strategy<Value = Vec<CategoryRecord>> {
    prop::collection::vec(any::<bool>(), 0..6).prop_map(|kinds| {
        let names = ["Food", "Income", "Rent", "Travel", "Gifts", "Misc"];
        kinds
            .into_iter()
            .enumerate()
            .map(|(i, income)| {
                let kind = if income { CategoryType::Income } else { CategoryType::Expense };
                category(i as i32 + 1, names[i], kind)
            })
            .collect()
    })
}

proptest! {
    /// Category totals never go below zero, whatever the mix of signs.
    #[test]
    fn prop_category_totals_are_clamped(
        categories in arb_categories(),
        transactions in prop::collection::vec(arb_transaction(), 0..40),
    ) {
        let summary = AggregationService::category_summary(&categories, &transactions);

        prop_assert_eq!(summary.len(), categories.len());
        for entry in &summary {
            prop_assert!(entry.total.amount() >= Decimal::ZERO);
            match entry.kind {
                CategoryType::Income => prop_assert!(matches!(entry.total, CategoryTotal::Earned(_))),
                CategoryType::Expense => prop_assert!(matches!(entry.total, CategoryTotal::Spent(_))),
            }
        }
    }

    /// The trend lists exactly the years with expenses and reproduces each year's sum.
    #[test]
    fn prop_annual_trend_matches_negative_sums(
        transactions in prop::collection::vec(arb_transaction(), 0..40),
    ) {
        let mut expected: BTreeMap<i32, Decimal> = BTreeMap::new();
        for t in transactions.iter().filter(|t| t.amount < Decimal::ZERO) {
            *expected.entry(t.date.year()).or_default() += t.amount;
        }

        let trend = AggregationService::annual_spending_trend(&transactions);

        let years: BTreeSet<i32> = trend.iter().map(|r| r.year).collect();
        prop_assert_eq!(years.len(), trend.len());
        prop_assert_eq!(years, expected.keys().copied().collect::<BTreeSet<_>>());
        prop_assert!(trend.windows(2).all(|w| w[0].year < w[1].year));
        for row in &trend {
            prop_assert_eq!(-row.total, expected[&row.year]);
        }
    }

    /// A month without expenses reports zero spending.
    #[test]
    fn prop_empty_month_reports_zero(
        transactions in prop::collection::vec(arb_transaction(), 0..40),
        year in 2015i32..2030,
        month in 1u32..=12,
    ) {
        let as_of = d(year, month, 15);
        let outside: Vec<_> = transactions
            .into_iter()
            .filter(|t| !(t.date.year() == year && t.date.month() == month))
            .collect();

        let summary = AggregationService::dashboard_summary(as_of, &outside, &[], Vec::new());

        prop_assert_eq!(summary.monthly_spending, Decimal::ZERO);
        prop_assert!(summary.yearly_spending >= Decimal::ZERO);
    }
}
