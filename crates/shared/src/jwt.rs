//! JWT token generation and validation.
//!
//! Access and refresh tokens share a signing key; the `typ` claim keeps one
//! from being accepted in place of the other.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use crate::auth::{Claims, TokenKind};

/// JWT configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token lifetime in seconds.
    pub access_token_expires_secs: i64,
    /// Refresh token lifetime in seconds.
    pub refresh_token_expires_secs: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            access_token_expires_secs: 15 * 60,
            refresh_token_expires_secs: 7 * 24 * 60 * 60,
        }
    }
}

impl From<&crate::config::JwtSettings> for JwtConfig {
    fn from(settings: &crate::config::JwtSettings) -> Self {
        Self {
            secret: settings.secret.clone(),
            access_token_expires_secs: i64::try_from(settings.access_token_expiry_secs)
                .unwrap_or(i64::MAX),
            refresh_token_expires_secs: i64::try_from(settings.refresh_token_expiry_secs)
                .unwrap_or(i64::MAX),
        }
    }
}

/// Errors that can occur during JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Token encoding failed.
    #[error("failed to encode token: {0}")]
    EncodingError(String),

    /// Token decoding failed.
    #[error("failed to decode token: {0}")]
    DecodingError(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,

    /// Token is well-formed but of the wrong kind.
    #[error("wrong token type")]
    WrongKind,
}

/// A freshly minted token with its expiry.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Encoded JWT.
    pub token: String,
    /// When the token stops being valid.
    pub expires_at: DateTime<Utc>,
}

/// JWT service for token operations.
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_token_expires_secs", &self.config.access_token_expires_secs)
            .field("refresh_token_expires_secs", &self.config.refresh_token_expires_secs)
            .field("keys", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Creates a new JWT service with the given configuration.
    #[must_use]
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Generates an access token for a user.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn generate_access_token(&self, user_id: i32) -> Result<IssuedToken, JwtError> {
        self.issue(user_id, TokenKind::Access, self.config.access_token_expires_secs)
    }

    /// Generates a refresh token for a user.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn generate_refresh_token(&self, user_id: i32) -> Result<IssuedToken, JwtError> {
        self.issue(user_id, TokenKind::Refresh, self.config.refresh_token_expires_secs)
    }

    fn issue(&self, user_id: i32, kind: TokenKind, ttl_secs: i64) -> Result<IssuedToken, JwtError> {
        let expires_at = Utc::now() + Duration::seconds(ttl_secs);
        let claims = Claims::new(user_id, kind, expires_at);

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Validates a token and checks it is of the expected kind.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` if the token has expired,
    /// `JwtError::WrongKind` if it is valid but of the other kind, and
    /// `JwtError::DecodingError` if it is malformed or badly signed.
    pub fn validate(&self, token: &str, expected: TokenKind) -> Result<Claims, JwtError> {
        let validation = Validation::default();

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::DecodingError(e.to_string()),
            })?;

        if claims.typ != expected {
            return Err(JwtError::WrongKind);
        }
        Ok(claims)
    }

    /// Returns the access token expiration in seconds.
    #[must_use]
    pub const fn access_token_expires_in(&self) -> i64 {
        self.config.access_token_expires_secs
    }
}
