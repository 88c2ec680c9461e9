//! Shared errors, configuration, and authentication types for Tally.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types with field-level validation errors
//! - Configuration management
//! - JWT access/refresh token handling
//! - Authentication request and response payloads

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;


pub use auth::{Claims, TokenKind, TokenPair};
pub use config::{AppConfig, LogFormat};
pub use error::{AppError, FieldErrors};
pub use jwt::{IssuedToken, JwtConfig, JwtError, JwtService};
