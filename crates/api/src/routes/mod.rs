//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod billing;
pub mod companies;
pub mod credentials;
pub mod dashboard;
pub mod health;
pub mod profile;
pub mod subscription_plans;
pub mod users;
pub mod workflows;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(companies::routes())
        .merge(billing::routes())
        .merge(users::routes())
        .merge(subscription_plans::routes())
        .merge(credentials::routes())
        .merge(workflows::routes())
        .merge(dashboard::routes())
        .merge(profile::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new().merge(health::routes()).merge(protected_routes)
}
