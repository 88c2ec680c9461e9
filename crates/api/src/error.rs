//! HTTP error responses.
//!
//! Every handler returns [`ApiResult`]; repository and auth errors convert
//! into [`ApiError`] and render as `{"error", "message", "fields"?}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde_json::json;
use tally_core::auth::PasswordError;
use tally_db::repositories::{BudgetError, CategoryError, TransactionError, UserError};
use tally_shared::{AppError, JwtError};

/// Message returned in place of server-side error details.
const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// An [`AppError`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// Resource missing or not owned by the caller.
    #[must_use]
    pub fn not_found() -> Self {
        Self(AppError::NotFound("Not found.".to_string()))
    }

    /// Missing or invalid credentials.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self(AppError::Unauthorized(message.into()))
    }

    /// Validation failure on a single field.
    #[must_use]
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        Self(AppError::field(field, message))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = self.0;
        let status =
            StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if error.is_server_error() {
            tracing::error!(error = %error, "request failed");
        }

        let body = match &error {
            AppError::Validation(fields) => json!({
                "error": error.error_code(),
                "message": error.to_string(),
                "fields": fields,
            }),
            AppError::Unauthorized(message)
            | AppError::NotFound(message)
            | AppError::Credential(message) => json!({
                "error": error.error_code(),
                "message": message,
            }),
            AppError::Database(_) | AppError::Internal(_) => json!({
                "error": error.error_code(),
                "message": INTERNAL_MESSAGE,
            }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self(error)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self(AppError::from(errors))
    }
}

impl From<DbErr> for ApiError {
    fn from(error: DbErr) -> Self {
        Self(AppError::Database(error.to_string()))
    }
}

impl From<PasswordError> for ApiError {
    fn from(error: PasswordError) -> Self {
        Self(AppError::Internal(error.to_string()))
    }
}

impl From<JwtError> for ApiError {
    fn from(error: JwtError) -> Self {
        match error {
            JwtError::EncodingError(message) => Self(AppError::Internal(message)),
            JwtError::Expired => Self::unauthorized("Token is expired"),
            JwtError::DecodingError(_) | JwtError::WrongKind => {
                Self::unauthorized("Token is invalid or expired")
            }
        }
    }
}

impl From<TransactionError> for ApiError {
    fn from(error: TransactionError) -> Self {
        match error {
            TransactionError::NotFound(_) => Self::not_found(),
            TransactionError::InvalidCategory(id) => Self::field(
                "category_id",
                format!("Invalid pk \"{id}\" - object does not exist."),
            ),
            TransactionError::InvalidAmount(e) => Self::field("amount", e.to_string()),
            TransactionError::Database(e) => e.into(),
        }
    }
}

impl From<CategoryError> for ApiError {
    fn from(error: CategoryError) -> Self {
        match error {
            CategoryError::NotFound(_) => Self::not_found(),
            CategoryError::DuplicateName(_) => {
                Self::field("name", "You already have a category with this name.")
            }
            CategoryError::Database(e) => e.into(),
        }
    }
}

impl From<BudgetError> for ApiError {
    fn from(error: BudgetError) -> Self {
        match error {
            BudgetError::NotFound(_) => Self::not_found(),
            BudgetError::InvalidCategory(id) => Self::field(
                "category",
                format!("Invalid pk \"{id}\" - object does not exist."),
            ),
            BudgetError::InvalidAmount(e) => Self::field("amount", e.to_string()),
            BudgetError::DuplicateMonth => Self::field(
                "month",
                "A budget for this category and month already exists.",
            ),
            BudgetError::Database(e) => e.into(),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(error: UserError) -> Self {
        match error {
            UserError::NotFound(_) => Self::not_found(),
            UserError::EmailTaken(_) => Self(AppError::Credential(
                "A user with that email already exists.".to_string(),
            )),
            UserError::Database(e) => e.into(),
        }
    }
}
