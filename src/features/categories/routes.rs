use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::categories::handlers;
use crate::features::categories::services::CategoryService;

/// Create routes for the categories feature (admin only)
pub fn routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route(
            "/api/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/api/categories/{id}",
            patch(handlers::update_category).delete(handlers::delete_category),
        )
        .route(
            "/api/categories/{id}/active",
            post(handlers::set_category_active),
        )
        .with_state(service)
}
