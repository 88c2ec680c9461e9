//! Budget routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiResult, extractors::ApiJson, middleware::AuthUser};
use tally_core::money;
use tally_db::{
    BudgetRepository,
    entities::{budgets, categories},
    repositories::BudgetInput,
};

/// Creates the budget routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/budgets/", get(list_budgets).post(create_budget))
        .route("/budgets/{id}/", put(update_budget).delete(delete_budget))
}

/// Request body for creating or replacing a budget.
#[derive(Debug, Deserialize)]
pub struct BudgetRequest {
    /// Category ID.
    pub category: i32,
    /// Planned amount, zero or more.
    pub amount: Decimal,
    /// Any day of the month; stored as the 1st.
    pub month: NaiveDate,
}

impl From<BudgetRequest> for BudgetInput {
    fn from(req: BudgetRequest) -> Self {
        Self {
            category_id: req.category,
            amount: req.amount,
            month: req.month,
        }
    }
}

/// Budget as returned to clients.
#[derive(Debug, Serialize)]
pub struct BudgetResponse {
    /// Budget ID.
    pub id: i32,
    /// Category ID.
    pub category: i32,
    /// Category name.
    pub category_name: String,
    /// Planned amount.
    pub amount: Decimal,
    /// First day of the budgeted month.
    pub month: NaiveDate,
}

impl BudgetResponse {
    fn new(budget: budgets::Model, category: categories::Model) -> Self {
        Self {
            id: budget.id,
            category: budget.category_id,
            category_name: category.name,
            amount: money::from_minor(budget.amount_minor),
            month: budget.month,
        }
    }
}

/// GET /budgets/
async fn list_budgets(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<BudgetResponse>>> {
    let rows = BudgetRepository::new((*state.db).clone())
        .list(auth.user_id())
        .await?;
    Ok(Json(
        rows.into_iter()
            .map(|(budget, category)| BudgetResponse::new(budget, category))
            .collect(),
    ))
}

/// POST /budgets/ - Create, or overwrite the amount for an existing month.
async fn create_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<BudgetRequest>,
) -> ApiResult<(StatusCode, Json<BudgetResponse>)> {
    let saved = BudgetRepository::new((*state.db).clone())
        .upsert(auth.user_id(), payload.into())
        .await?;
    let status = if saved.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(BudgetResponse::new(saved.budget, saved.category))))
}

/// PUT /budgets/{id}/
async fn update_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    ApiJson(payload): ApiJson<BudgetRequest>,
) -> ApiResult<Json<BudgetResponse>> {
    let (budget, category) = BudgetRepository::new((*state.db).clone())
        .update(auth.user_id(), id, payload.into())
        .await?;
    Ok(Json(BudgetResponse::new(budget, category)))
}

/// DELETE /budgets/{id}/
async fn delete_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    BudgetRepository::new((*state.db).clone())
        .delete(auth.user_id(), id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
