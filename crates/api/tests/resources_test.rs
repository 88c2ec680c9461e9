//! Transactions, categories, budgets and summaries over HTTP.

mod common;

use axum::http::StatusCode;
use common::{category_id, register_and_login, send, test_app};
use rstest::rstest;
use serde_json::{Value, json};

#[tokio::test]
async fn test_transaction_crud_and_dashboard() {
    let app = test_app().await;
    let (token, _) = register_and_login(&app, "ledger@example.com").await;
    let food = category_id(&app, &token, "Food").await;

    for (date, amount, category) in [
        ("2024-03-02", "-50.00", "Food"),
        ("2024-03-15", "-20", "Food"),
        ("2024-03-20", "1000", "Income"),
        ("2024-02-10", "-30.50", "Utilities"),
        ("2023-12-31", "-99", "Utilities"),
    ] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/transactions/",
            Some(&token),
            Some(json!({ "date": date, "amount": amount, "category": category })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, _) = send(
        &app,
        "POST",
        "/api/budgets/",
        Some(&token),
        Some(json!({ "category": food, "amount": "300", "month": "2024-03-17" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, summary) = send(
        &app,
        "GET",
        "/api/dashboard/?as_of=2024-03-25",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["monthlySpending"], "70.00");
    assert_eq!(summary["monthlyBudget"], "300.00");
    assert_eq!(summary["yearlySpending"], "100.50");
    let recent = summary["recentTransactions"].as_array().unwrap();
    assert_eq!(recent.len(), 5);
    assert_eq!(recent[0]["date"], "2024-03-20");

    let (status, trend) = send(&app, "GET", "/api/annual-spending/", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        trend,
        json!([
            { "year": 2023, "total": "99.00" },
            { "year": 2024, "total": "100.50" }
        ])
    );

    let (status, alias) = send(
        &app,
        "GET",
        "/api/analytics/annual-spending/",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(alias, trend);
}

#[tokio::test]
async fn test_dashboard_rejects_malformed_date() {
    let app = test_app().await;
    let (token, _) = register_and_login(&app, "dates@example.com").await;

    let (status, body) = send(
        &app,
        "GET",
        "/api/dashboard/?as_of=25-03-2024",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["as_of"].is_array());
}

#[tokio::test]
async fn test_transaction_update_and_delete() {
    let app = test_app().await;
    let (token, _) = register_and_login(&app, "edit@example.com").await;

    let (_, created) = send(
        &app,
        "POST",
        "/api/transactions/",
        Some(&token),
        Some(json!({ "date": "2024-05-01", "amount": -12.5, "description": "Lunch" })),
    )
    .await;
    assert_eq!(created["category"], "N/A");
    assert_eq!(created["amount"], "-12.50");
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/transactions/{id}/"),
        Some(&token),
        Some(json!({ "date": "2024-05-02", "amount": "-15", "category": "Food" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["category"], "Food");
    assert!(updated["category_id"].is_i64());

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/transactions/{id}/"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, list) = send(&app, "GET", "/api/transactions/", Some(&token), None).await;
    assert_eq!(list, json!([]));
}

#[rstest]
#[case::too_many_decimals(json!({ "date": "2024-05-01", "amount": "1.234" }), "amount")]
#[case::out_of_range(json!({ "date": "2024-05-01", "amount": "100000000" }), "amount")]
#[case::missing_date(json!({ "amount": "10" }), "body")]
#[case::long_description(
    json!({ "date": "2024-05-01", "amount": "-1", "description": "x".repeat(256) }),
    "description"
)]
#[tokio::test]
async fn test_transaction_validation(#[case] payload: Value, #[case] field: &str) {
    let app = test_app().await;
    let (token, _) = register_and_login(&app, "strict@example.com").await;

    let (status, body) = send(&app, "POST", "/api/transactions/", Some(&token), Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"][field].is_array(), "{body}");
}

#[tokio::test]
async fn test_other_users_rows_are_not_found() {
    let app = test_app().await;
    let (alice, _) = register_and_login(&app, "alice@example.com").await;
    let (bob, _) = register_and_login(&app, "bob@example.com").await;

    let (_, tx) = send(
        &app,
        "POST",
        "/api/transactions/",
        Some(&alice),
        Some(json!({ "date": "2024-01-01", "amount": "-5" })),
    )
    .await;
    let tx_id = tx["id"].as_i64().unwrap();
    let alice_food = category_id(&app, &alice, "Food").await;

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/transactions/{tx_id}/"),
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/categories/{alice_food}/"),
        Some(&bob),
        Some(json!({ "name": "Groceries" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        "POST",
        "/api/transactions/",
        Some(&bob),
        Some(json!({ "date": "2024-01-01", "amount": "-5", "category_id": alice_food })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["category_id"].is_array());

    let (_, bob_list) = send(&app, "GET", "/api/transactions/", Some(&bob), None).await;
    assert_eq!(bob_list, json!([]));
}

#[tokio::test]
async fn test_category_crud_and_summary() {
    let app = test_app().await;
    let (token, _) = register_and_login(&app, "cats@example.com").await;

    let (status, created) = send(
        &app,
        "POST",
        "/api/categories/",
        Some(&token),
        Some(json!({ "name": "  Travel ", "color": "#123ABC" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Travel");
    assert_eq!(created["type"], "expense");
    let travel = created["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/api/categories/",
        Some(&token),
        Some(json!({ "name": "Travel" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["name"].is_array());

    let (status, body) = send(
        &app,
        "POST",
        "/api/categories/",
        Some(&token),
        Some(json!({ "name": "Gifts", "color": "red" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["color"].is_array());

    send(
        &app,
        "POST",
        "/api/transactions/",
        Some(&token),
        Some(json!({ "date": "2024-06-01", "amount": "-40", "category_id": travel })),
    )
    .await;
    send(
        &app,
        "POST",
        "/api/transactions/",
        Some(&token),
        Some(json!({ "date": "2024-06-02", "amount": "2500", "category": "Income" })),
    )
    .await;

    let (status, summary) = send(&app, "GET", "/api/categories/summary/", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = summary.as_array().unwrap();
    assert_eq!(rows.len(), 6);
    let travel_row = rows.iter().find(|r| r["name"] == "Travel").unwrap();
    assert_eq!(travel_row["total_spent"], "40.00");
    let income_row = rows.iter().find(|r| r["name"] == "Income").unwrap();
    assert_eq!(income_row["total_earned"], "2500.00");
    assert!(income_row.get("total_spent").is_none());

    let (status, renamed) = send(
        &app,
        "PUT",
        &format!("/api/categories/{travel}/"),
        Some(&token),
        Some(json!({ "name": "Trips", "color": "#123ABC" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["name"], "Trips");

    let (_, list) = send(&app, "GET", "/api/transactions/", Some(&token), None).await;
    assert!(list.as_array().unwrap().iter().any(|t| t["category"] == "Trips"));

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/categories/{travel}/"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, list) = send(&app, "GET", "/api/transactions/", Some(&token), None).await;
    assert_eq!(list.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_budget_upsert_update_and_delete() {
    let app = test_app().await;
    let (token, _) = register_and_login(&app, "plans@example.com").await;
    let food = category_id(&app, &token, "Food").await;

    let (status, first) = send(
        &app,
        "POST",
        "/api/budgets/",
        Some(&token),
        Some(json!({ "category": food, "amount": "200", "month": "2024-04-09" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["month"], "2024-04-01");
    assert_eq!(first["category_name"], "Food");

    let (status, second) = send(
        &app,
        "POST",
        "/api/budgets/",
        Some(&token),
        Some(json!({ "category": food, "amount": "250", "month": "2024-04-30" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["id"], first["id"]);
    assert_eq!(second["amount"], "250.00");

    let (status, body) = send(
        &app,
        "POST",
        "/api/budgets/",
        Some(&token),
        Some(json!({ "category": food, "amount": "-1", "month": "2024-04-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["amount"].is_array());

    let (_, may) = send(
        &app,
        "POST",
        "/api/budgets/",
        Some(&token),
        Some(json!({ "category": food, "amount": "100", "month": "2024-05-01" })),
    )
    .await;
    let may_id = may["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/budgets/{may_id}/"),
        Some(&token),
        Some(json!({ "category": food, "amount": "100", "month": "2024-04-15" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["month"].is_array());

    let (_, list) = send(&app, "GET", "/api/budgets/", Some(&token), None).await;
    let months: Vec<_> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["month"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(months, ["2024-05-01", "2024-04-01"]);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/budgets/{may_id}/"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (other, _) = register_and_login(&app, "intruder@example.com").await;
    let (status, _) = send(&app, "GET", "/api/budgets/", Some(&other), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(
        &app,
        "POST",
        "/api/budgets/",
        Some(&other),
        Some(json!({ "category": food, "amount": "10", "month": "2024-04-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["category"].is_array());
}
