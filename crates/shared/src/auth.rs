//! Authentication types for JWT and account endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Which half of a token pair a JWT is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived token sent as `Authorization: Bearer`.
    Access,
    /// Long-lived token exchanged for new pairs.
    Refresh,
}

/// JWT claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: i32,
    /// Unique token ID.
    pub jti: Uuid,
    /// Token kind.
    pub typ: TokenKind,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(user_id: i32, typ: TokenKind, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: user_id,
            jti: Uuid::new_v4(),
            typ,
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> i32 {
        self.sub
    }
}

/// Token pair returned after successful authentication or rotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Access token (short-lived).
    pub access_token: String,
    /// Refresh token (long-lived).
    pub refresh_token: String,
    /// Access token expiration in seconds.
    pub expires_in: i64,
}

impl TokenPair {
    /// Creates a new token pair.
    #[must_use]
    pub fn new(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_in,
        }
    }
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// User email.
    pub email: String,
    /// User password.
    pub password: String,
}

/// Registration request payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// User email.
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    /// User password.
    pub password: String,
    /// User full name.
    #[serde(default)]
    #[validate(length(max = 150, message = "Ensure this field has no more than 150 characters."))]
    pub full_name: String,
}

/// Refresh token request, used for both rotation and blacklisting.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    /// The refresh token.
    pub refresh_token: String,
}

/// Password change request.
#[derive(Debug, Clone, Deserialize)]
pub struct SetPasswordRequest {
    /// The password currently on the account.
    pub current_password: String,
    /// The replacement password.
    pub new_password: String,
}

/// Basic identity of the authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    /// User ID.
    pub id: i32,
    /// User email.
    pub email: String,
    /// User full name.
    pub full_name: String,
}

/// Profile as shown on the settings page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    /// User full name.
    pub full_name: String,
    /// User email.
    pub email: String,
    /// Preferred display currency code.
    pub currency: String,
}

/// Profile update. Omitted fields keep their current value.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// New full name.
    #[validate(length(max = 150, message = "Ensure this field has no more than 150 characters."))]
    pub full_name: Option<String>,
    /// New email.
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    /// New currency code.
    #[validate(length(min = 3, max = 3, message = "Currency must be a 3-letter code."))]
    pub currency: Option<String>,
}
