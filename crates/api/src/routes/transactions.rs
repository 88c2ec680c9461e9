//! Transaction routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::{AppState, error::ApiResult, extractors::ApiJson, middleware::AuthUser};
use tally_core::aggregation::TransactionRecord;
use tally_db::{TransactionRepository, repositories::TransactionInput};

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions/", get(list_transactions).post(create_transaction))
        .route(
            "/transactions/{id}/",
            put(update_transaction).delete(delete_transaction),
        )
}

/// Request body for creating or replacing a transaction.
#[derive(Debug, Deserialize, Validate)]
pub struct TransactionRequest {
    /// Calendar date (YYYY-MM-DD).
    pub date: NaiveDate,
    /// Signed amount; negative is an expense.
    pub amount: Decimal,
    /// Optional description.
    #[serde(default)]
    #[validate(length(max = 255, message = "Ensure this field has no more than 255 characters."))]
    pub description: Option<String>,
    /// Category name, used when `category_id` is absent.
    #[serde(default)]
    #[validate(length(max = 100, message = "Ensure this field has no more than 100 characters."))]
    pub category: Option<String>,
    /// Category to link.
    #[serde(default)]
    pub category_id: Option<i32>,
}

impl From<TransactionRequest> for TransactionInput {
    fn from(req: TransactionRequest) -> Self {
        Self {
            date: req.date,
            amount: req.amount,
            description: req.description,
            category: req.category,
            category_id: req.category_id,
        }
    }
}

/// GET /transactions/
async fn list_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<TransactionRecord>>> {
    let rows = TransactionRepository::new((*state.db).clone())
        .list(auth.user_id())
        .await?;
    Ok(Json(rows))
}

/// POST /transactions/
async fn create_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<TransactionRequest>,
) -> ApiResult<(StatusCode, Json<TransactionRecord>)> {
    payload.validate()?;
    let record = TransactionRepository::new((*state.db).clone())
        .create(auth.user_id(), payload.into())
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /transactions/{id}/
async fn update_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    ApiJson(payload): ApiJson<TransactionRequest>,
) -> ApiResult<Json<TransactionRecord>> {
    payload.validate()?;
    let record = TransactionRepository::new((*state.db).clone())
        .update(auth.user_id(), id, payload.into())
        .await?;
    Ok(Json(record))
}

/// DELETE /transactions/{id}/
async fn delete_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    TransactionRepository::new((*state.db).clone())
        .delete(auth.user_id(), id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
