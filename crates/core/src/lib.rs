//! Core business logic for Tally.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `aggregation` - Dashboard, annual trend and per-category summaries
//! - `auth` - Password hashing and strength rules
//! - `category` - Category kinds, starter set and color rules
//! - `money` - Two-decimal amounts and their minor-unit storage form
//! - `period` - Calendar month and year boundaries

pub mod aggregation;
pub mod auth;
pub mod category;
pub mod money;
pub mod period;
