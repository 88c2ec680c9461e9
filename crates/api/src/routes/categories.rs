//! Category routes, including the per-category summary.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::ApiJson,
    middleware::AuthUser,
};
use tally_core::aggregation::CategorySummary;
use tally_core::category::{CategoryType, is_valid_color};
use tally_db::{
    CategoryRepository, SummaryRepository, entities::categories, repositories::CategoryInput,
};

/// Creates the category routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories/", get(list_categories).post(create_category))
        .route("/categories/summary/", get(category_summary))
        .route(
            "/categories/{id}/",
            put(update_category).delete(delete_category),
        )
}

/// Request body for creating or replacing a category.
#[derive(Debug, Deserialize, Validate)]
pub struct CategoryRequest {
    /// Category name.
    #[validate(length(
        min = 1,
        max = 100,
        message = "Ensure this field has between 1 and 100 characters."
    ))]
    pub name: String,
    /// `#RRGGBB`, black when omitted.
    #[serde(default)]
    pub color: Option<String>,
    /// `expense` (default) or `income`.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl CategoryRequest {
    fn into_input(mut self) -> ApiResult<CategoryInput> {
        self.name = self.name.trim().to_string();
        self.validate()?;

        if let Some(color) = &self.color {
            if !is_valid_color(color) {
                return Err(ApiError::field("color", "Enter a color as #RRGGBB."));
            }
        }

        let kind = match self.kind.as_deref() {
            Some(kind) => kind
                .parse::<CategoryType>()
                .map_err(|message| ApiError::field("type", message))?,
            None => CategoryType::default(),
        };

        Ok(CategoryInput {
            name: self.name,
            color: self.color,
            kind,
        })
    }
}

/// Category as returned to clients.
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    /// Category ID.
    pub id: i32,
    /// Category name.
    pub name: String,
    /// Display color.
    pub color: String,
    /// `expense` or `income`.
    #[serde(rename = "type")]
    pub kind: CategoryType,
}

impl From<categories::Model> for CategoryResponse {
    fn from(model: categories::Model) -> Self {
        let kind = CategoryRepository::kind_of(&model);
        Self {
            id: model.id,
            name: model.name,
            color: model.color,
            kind,
        }
    }
}

/// GET /categories/
async fn list_categories(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<CategoryResponse>>> {
    let rows = CategoryRepository::new((*state.db).clone())
        .list(auth.user_id())
        .await?;
    Ok(Json(rows.into_iter().map(CategoryResponse::from).collect()))
}

/// POST /categories/
async fn create_category(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<CategoryRequest>,
) -> ApiResult<(StatusCode, Json<CategoryResponse>)> {
    let input = payload.into_input()?;
    let model = CategoryRepository::new((*state.db).clone())
        .create(auth.user_id(), input)
        .await?;
    Ok((StatusCode::CREATED, Json(model.into())))
}

/// PUT /categories/{id}/
async fn update_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    ApiJson(payload): ApiJson<CategoryRequest>,
) -> ApiResult<Json<CategoryResponse>> {
    let input = payload.into_input()?;
    let model = CategoryRepository::new((*state.db).clone())
        .update(auth.user_id(), id, input)
        .await?;
    Ok(Json(model.into()))
}

/// DELETE /categories/{id}/
async fn delete_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    CategoryRepository::new((*state.db).clone())
        .delete(auth.user_id(), id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /categories/summary/
async fn category_summary(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<CategorySummary>>> {
    let summary = SummaryRepository::new((*state.db).clone())
        .category_summary(auth.user_id())
        .await?;
    Ok(Json(summary))
}
