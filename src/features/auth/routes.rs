use crate::core::middleware::auth_middleware;
use crate::features::auth::handlers;
use crate::features::auth::services::AuthService;
use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Public auth routes (no authentication required)
pub fn public_routes(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/refresh", post(handlers::refresh_token))
        .with_state(service)
}

/// Session routes; any signed-in user, admin or not
pub fn protected_routes(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/api/auth/me", get(handlers::get_me))
        .route("/api/auth/logout", post(handlers::logout))
        .route_layer(from_fn_with_state(Arc::clone(&service), auth_middleware))
        .with_state(service)
}
