//! Read-only summaries over a single user's records.
//!
//! This module provides pure business logic for:
//! - The dashboard (monthly/yearly spending, monthly budget, recent activity)
//! - The annual spending trend
//! - Per-category totals
//!
//! Callers are responsible for scoping: every slice handed to
//! [`AggregationService`] must already be restricted to one user.

pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use service::AggregationService;
pub use types::*;
