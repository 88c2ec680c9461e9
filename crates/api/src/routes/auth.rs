//! Registration and token endpoints.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use serde_json::{Value, json};
use tracing::info;
use validator::Validate;

use crate::{AppState, error::ApiError, error::ApiResult, extractors::ApiJson};
use tally_core::auth::{hash_password, validate_password_strength, verify_password};
use tally_db::{SessionRepository, UserRepository};
use tally_shared::{
    AppError, TokenKind, TokenPair,
    auth::{LoginRequest, RefreshRequest, RegisterRequest, UserInfo},
};

/// Message for any failed login, whatever the cause.
const BAD_CREDENTIALS: &str = "No active account found with the given credentials";

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register/", post(register))
        .route("/token/", post(login))
        .route("/token/refresh/", post(refresh))
        .route("/token/blacklist/", post(blacklist))
}

/// Lowercases and trims an email so lookups are case-insensitive.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Issues an access/refresh pair and records the refresh token's session.
pub(crate) async fn issue_token_pair(state: &AppState, user_id: i32) -> ApiResult<TokenPair> {
    let access = state.jwt_service.generate_access_token(user_id)?;
    let refresh = state.jwt_service.generate_refresh_token(user_id)?;

    SessionRepository::new((*state.db).clone())
        .create(user_id, &refresh.token, refresh.expires_at)
        .await?;

    Ok(TokenPair::new(
        access.token,
        refresh.token,
        state.jwt_service.access_token_expires_in(),
    ))
}

/// POST /register/ - Create an account with the starter categories.
async fn register(
    State(state): State<AppState>,
    ApiJson(mut payload): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserInfo>)> {
    payload.email = normalize_email(&payload.email);
    payload.validate()?;

    let problems = validate_password_strength(&payload.password, Some(&payload.email));
    if !problems.is_empty() {
        let mut fields = tally_shared::FieldErrors::new();
        fields.insert("password".to_string(), problems);
        return Err(AppError::Validation(fields).into());
    }

    let repo = UserRepository::new((*state.db).clone());
    if repo.email_exists(&payload.email).await? {
        return Err(ApiError::field("email", "A user with that email already exists."));
    }

    let password_hash = hash_password(&payload.password)?;
    let user = repo
        .register(&payload.email, &password_hash, payload.full_name.trim())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UserInfo {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
        }),
    ))
}

/// POST /token/ - Exchange email and password for a token pair.
async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> ApiResult<Json<TokenPair>> {
    let email = normalize_email(&payload.email);
    let user = UserRepository::new((*state.db).clone())
        .find_by_email(&email)
        .await?;

    let Some(user) = user.filter(|u| u.is_active) else {
        info!(email = %email, "login attempt for unknown or inactive account");
        return Err(ApiError::unauthorized(BAD_CREDENTIALS));
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        info!(user_id = user.id, "failed login attempt - invalid password");
        return Err(ApiError::unauthorized(BAD_CREDENTIALS));
    }

    let pair = issue_token_pair(&state, user.id).await?;
    info!(user_id = user.id, "user logged in");
    Ok(Json(pair))
}

/// POST /token/refresh/ - Rotate a refresh token into a new pair.
async fn refresh(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RefreshRequest>,
) -> ApiResult<Json<TokenPair>> {
    let claims = state
        .jwt_service
        .validate(&payload.refresh_token, TokenKind::Refresh)?;

    let sessions = SessionRepository::new((*state.db).clone());
    let active = sessions.find_active_by_token(&payload.refresh_token).await?;
    let rotated = match active {
        Some(session) => sessions.revoke(session.id).await?,
        None => false,
    };
    if !rotated {
        info!(user_id = claims.user_id(), "refresh with revoked or unknown token");
        return Err(ApiError::unauthorized("Token is blacklisted"));
    }

    let user = UserRepository::new((*state.db).clone())
        .find_by_id(claims.user_id())
        .await?;
    if !user.is_some_and(|u| u.is_active) {
        return Err(ApiError::unauthorized(BAD_CREDENTIALS));
    }

    Ok(Json(issue_token_pair(&state, claims.user_id()).await?))
}

/// POST /token/blacklist/ - Revoke a refresh token.
async fn blacklist(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RefreshRequest>,
) -> ApiResult<Json<Value>> {
    let claims = state
        .jwt_service
        .validate(&payload.refresh_token, TokenKind::Refresh)?;

    let revoked = SessionRepository::new((*state.db).clone())
        .revoke_by_token(&payload.refresh_token)
        .await?;
    if !revoked {
        return Err(ApiError::unauthorized("Token is blacklisted"));
    }

    info!(user_id = claims.user_id(), "refresh token blacklisted");
    Ok(Json(json!({})))
}
