//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth_middleware};

pub mod account;
pub mod auth;
pub mod budgets;
pub mod categories;
pub mod dashboard;
pub mod health;
pub mod transactions;

/// Creates the API router; everything except health and auth needs a bearer token.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(account::routes())
        .merge(transactions::routes())
        .merge(categories::routes())
        .merge(budgets::routes())
        .merge(dashboard::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}
