use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::places::handlers;
use crate::features::places::services::PlaceService;

/// Create routes for the places feature (admin only)
pub fn routes(service: Arc<PlaceService>) -> Router {
    Router::new()
        .route(
            "/api/places",
            get(handlers::list_places).post(handlers::create_place),
        )
        .route(
            "/api/places/{id}",
            patch(handlers::update_place).delete(handlers::delete_place),
        )
        .route("/api/places/{id}/active", post(handlers::set_place_active))
        .with_state(service)
}
