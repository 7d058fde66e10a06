use axum::{extract::State, Json};
use chrono::Utc;
use std::sync::Arc;

use crate::core::error::AppError;
use crate::features::auth::guards::RequireAdmin;
use crate::features::dashboard::dtos::*;
use crate::features::dashboard::services::DashboardService;
use crate::shared::types::ApiResponse;

// ============================================================================
// Summary
// ============================================================================

/// Get the dashboard landing summary
///
/// Collections that fail to load are listed in `warnings`; the counters
/// are computed from whatever did load.
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "dashboard",
    responses(
        (status = 200, description = "Dashboard summary", body = ApiResponse<DashboardSummaryDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_dashboard(
    _admin: RequireAdmin,
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<ApiResponse<DashboardSummaryDto>>, AppError> {
    let summary = service.get_summary().await;
    Ok(Json(ApiResponse::success(Some(summary), None, None)))
}

// ============================================================================
// Statistics
// ============================================================================

/// Get per-category rollups, leaderboards and global counters
#[utoipa::path(
    get,
    path = "/api/stats",
    tag = "dashboard",
    responses(
        (status = 200, description = "Statistics", body = ApiResponse<StatsDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_stats(
    _admin: RequireAdmin,
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<ApiResponse<StatsDto>>, AppError> {
    let stats = service.get_stats(Utc::now()).await;
    Ok(Json(ApiResponse::success(Some(stats), None, None)))
}
