//! Request extractors.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};

use crate::error::ApiError;

/// JSON body extractor whose rejections use the API error format.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::field("body", rejection.body_text())),
        }
    }
}
