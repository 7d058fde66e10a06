use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::features::reports::handlers;
use crate::features::reports::services::ReportService;

/// Create routes for report moderation (admin only)
pub fn routes(service: Arc<ReportService>) -> Router {
    Router::new()
        .route("/api/reports", get(handlers::list_reports))
        .route("/api/reports/{id}", delete(handlers::delete_report))
        .route(
            "/api/reports/{id}/verified",
            post(handlers::set_report_verified),
        )
        .route(
            "/api/reports/{id}/flagged",
            post(handlers::set_report_flagged),
        )
        .with_state(service)
}
