//! Shared harness for HTTP-level tests: an in-memory database behind the full router.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tally_api::{AppState, create_router};
use tally_db::migration::{Migrator, MigratorTrait};
use tally_shared::{JwtConfig, JwtService};
use tower::ServiceExt;

pub const PASSWORD: &str = "correct-horse-42";

/// Router over a freshly migrated in-memory database.
pub async fn test_app() -> Router {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let jwt_service = JwtService::new(JwtConfig {
        secret: "api-tests-secret".to_string(),
        ..JwtConfig::default()
    });

    create_router(AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
    })
}

/// Sends a request and returns the status with the parsed JSON body (`Null` when empty).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Registers an account and returns its access and refresh tokens.
pub async fn register_and_login(app: &Router, email: &str) -> (String, String) {
    let (status, _) = send(
        app,
        "POST",
        "/api/register/",
        None,
        Some(json!({ "email": email, "password": PASSWORD, "full_name": "Test User" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        "POST",
        "/api/token/",
        None,
        Some(json!({ "email": email, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    (
        body["access_token"].as_str().unwrap().to_string(),
        body["refresh_token"].as_str().unwrap().to_string(),
    )
}

/// Looks up one of the caller's categories by name.
pub async fn category_id(app: &Router, token: &str, name: &str) -> i64 {
    let (_, body) = send(app, "GET", "/api/categories/", Some(token), None).await;
    body.as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == name)
        .and_then(|c| c["id"].as_i64())
        .unwrap()
}
