use std::sync::Arc;

use axum::{
    routing::{delete, get},
    Router,
};

use crate::features::admins::handlers;
use crate::features::admins::services::AdminService;

/// Create routes for admin management (admin only)
pub fn routes(service: Arc<AdminService>) -> Router {
    Router::new()
        .route(
            "/api/admins",
            get(handlers::list_admins).post(handlers::upsert_admin),
        )
        .route("/api/admins/{id}", delete(handlers::delete_admin))
        .with_state(service)
}
