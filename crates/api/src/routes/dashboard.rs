//! Dashboard and annual spending trend.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::AuthUser,
};
use tally_core::aggregation::{DashboardSummary, YearlySpending};
use tally_db::SummaryRepository;

/// Creates the dashboard and analytics routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard/", get(dashboard))
        .route("/annual-spending/", get(annual_spending))
        .route("/analytics/annual-spending/", get(annual_spending))
}

/// Query parameters for the dashboard.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// Reference date (YYYY-MM-DD); today (UTC) when absent.
    pub as_of: Option<String>,
}

/// GET /dashboard/
async fn dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<Json<DashboardSummary>> {
    let as_of = match query.as_of.as_deref() {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
            ApiError::field("as_of", "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.")
        })?,
        None => Utc::now().date_naive(),
    };

    let summary = SummaryRepository::new((*state.db).clone())
        .dashboard(auth.user_id(), as_of)
        .await?;
    Ok(Json(summary))
}

/// GET /annual-spending/
async fn annual_spending(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<YearlySpending>>> {
    let trend = SummaryRepository::new((*state.db).clone())
        .annual_spending(auth.user_id())
        .await?;
    Ok(Json(trend))
}
