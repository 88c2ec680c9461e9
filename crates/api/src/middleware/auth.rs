//! Authentication middleware for protected routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tally_db::UserRepository;
use tally_shared::{Claims, TokenKind};

use crate::AppState;
use crate::error::ApiError;

/// Validates the bearer access token and resolves the calling user.
///
/// Stores the token claims in request extensions for [`AuthUser`]. Tokens of
/// deleted or deactivated users are rejected.
///
/// # Errors
///
/// Returns 401 when the header is missing, the token is not a valid access
/// token, or its user is gone.
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(TypedHeader(Authorization(bearer))) = bearer else {
        return Err(ApiError::unauthorized(
            "Authentication credentials were not provided.",
        ));
    };

    let claims = state
        .jwt_service
        .validate(bearer.token(), TokenKind::Access)?;

    let user = UserRepository::new((*state.db).clone())
        .find_by_id(claims.user_id())
        .await?;
    if !user.is_some_and(|u| u.is_active) {
        tracing::info!(user_id = claims.user_id(), "token for missing or inactive user");
        return Err(ApiError::unauthorized("User not found"));
    }

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Extractor for the authenticated user.
///
/// Only available on routes behind [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the user ID from the claims.
    #[must_use]
    pub const fn user_id(&self) -> i32 {
        self.0.user_id()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}
