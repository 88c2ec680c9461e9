//! Authentication helpers.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - Password verification
//! - Password strength rules applied on registration and password change

mod password;
mod strength;

pub use password::{PasswordError, hash_password, verify_password};
pub use strength::{MIN_PASSWORD_LENGTH, validate_password_strength};
