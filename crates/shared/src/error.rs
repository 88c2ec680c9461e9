//! Application-wide error types.

use std::collections::BTreeMap;

use thiserror::Error;

/// Field name to list of messages, as returned to clients on validation failures.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or invalid credential on a protected endpoint.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Resource not found, or not owned by the caller.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed or missing fields.
    #[error("Validation error: {}", describe_fields(.0))]
    Validation(FieldErrors),

    /// Wrong current password, duplicate email, and similar credential problems.
    #[error("Credential error: {0}")]
    Credential(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Builds a validation error carrying a single field message.
    #[must_use]
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut fields = FieldErrors::new();
        fields.insert(field.to_string(), vec![message.into()]);
        Self::Validation(fields)
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::NotFound(_) => 404,
            Self::Validation(_) | Self::Credential(_) => 400,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Credential(_) => "CREDENTIAL_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true for errors whose details must not reach the client.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Internal(_))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        for (field, errs) in errors.field_errors() {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map_or_else(|| e.code.to_string(), ToString::to_string)
                })
                .collect();
            fields.insert(field.to_string(), messages);
        }
        Self::Validation(fields)
    }
}

fn describe_fields(fields: &FieldErrors) -> String {
    fields
        .iter()
        .map(|(field, messages)| format!("{field}: {}", messages.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}
