//! Current-user endpoints: identity, profile and password change.

use axum::{Json, Router, extract::State, routing::{get, post}};
use serde_json::{Value, json};
use validator::Validate;

use super::auth::normalize_email;
use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::ApiJson,
    middleware::AuthUser,
};
use tally_core::auth::{hash_password, validate_password_strength, verify_password};
use tally_db::{ProfileRepository, SessionRepository, UserRepository, entities::users};
use tally_shared::{
    AppError, FieldErrors,
    auth::{ProfileResponse, SetPasswordRequest, UpdateProfileRequest, UserInfo},
};

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me/", get(me))
        .route("/profile/", get(get_profile).put(update_profile))
        .route("/set-password/", post(set_password))
}

async fn current_user(state: &AppState, auth: &AuthUser) -> ApiResult<users::Model> {
    UserRepository::new((*state.db).clone())
        .find_by_id(auth.user_id())
        .await?
        .ok_or_else(|| ApiError::unauthorized("User not found"))
}

/// GET /me/
async fn me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<UserInfo>> {
    let user = current_user(&state, &auth).await?;
    Ok(Json(UserInfo {
        id: user.id,
        email: user.email,
        full_name: user.full_name,
    }))
}

/// GET /profile/
async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ProfileResponse>> {
    let user = current_user(&state, &auth).await?;
    let profile = ProfileRepository::new((*state.db).clone())
        .get_or_create(user.id)
        .await?;

    Ok(Json(ProfileResponse {
        full_name: user.full_name,
        email: user.email,
        currency: profile.currency,
    }))
}

/// PUT /profile/
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(mut payload): ApiJson<UpdateProfileRequest>,
) -> ApiResult<Json<ProfileResponse>> {
    payload.email = payload.email.as_deref().map(normalize_email);
    payload.validate()?;

    let users = UserRepository::new((*state.db).clone());
    let user = if payload.full_name.is_some() || payload.email.is_some() {
        users
            .update_identity(
                auth.user_id(),
                payload.full_name.map(|n| n.trim().to_string()),
                payload.email,
            )
            .await?
    } else {
        current_user(&state, &auth).await?
    };

    let profiles = ProfileRepository::new((*state.db).clone());
    let profile = match payload.currency {
        Some(currency) => {
            profiles
                .update_currency(user.id, &currency.to_uppercase())
                .await?
        }
        None => profiles.get_or_create(user.id).await?,
    };

    tracing::info!(user_id = user.id, "profile updated");
    Ok(Json(ProfileResponse {
        full_name: user.full_name,
        email: user.email,
        currency: profile.currency,
    }))
}

/// POST /set-password/ - Change password and sign out every session.
async fn set_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<SetPasswordRequest>,
) -> ApiResult<Json<Value>> {
    let user = current_user(&state, &auth).await?;

    if !verify_password(&payload.current_password, &user.password_hash)? {
        return Err(AppError::Credential("Current password is incorrect.".to_string()).into());
    }

    let problems = validate_password_strength(&payload.new_password, Some(&user.email));
    if !problems.is_empty() {
        let mut fields = FieldErrors::new();
        fields.insert("new_password".to_string(), problems);
        return Err(AppError::Validation(fields).into());
    }

    let password_hash = hash_password(&payload.new_password)?;
    UserRepository::new((*state.db).clone())
        .update_password(user.id, &password_hash)
        .await?;
    let revoked = SessionRepository::new((*state.db).clone())
        .revoke_all_user_sessions(user.id)
        .await?;

    tracing::info!(user_id = user.id, revoked, "password changed");
    Ok(Json(json!({ "detail": "Password updated." })))
}
