use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::reports::dtos::ListReportsQuery;
use crate::features::reports::models::Report;
use crate::features::reports::services::ReportService;
use crate::shared::invalidation::Invalidation;
use crate::shared::types::{list_response, ApiResponse, ConfirmQuery, ToggleDto};

/// List the latest reports
///
/// Returns at most 100 reports, newest first. `filter` is applied to that
/// window, so a filtered view can hold fewer than 100 rows.
#[utoipa::path(
    get,
    path = "/api/reports",
    params(ListReportsQuery),
    responses(
        (status = 200, description = "List of reports", body = ApiResponse<Vec<Report>>),
        (status = 502, description = "Backend rejected the request")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn list_reports(
    _admin: RequireAdmin,
    State(service): State<Arc<ReportService>>,
    Query(query): Query<ListReportsQuery>,
) -> Result<Json<ApiResponse<Vec<Report>>>> {
    let reports = service.list(query.place_id).await?;
    Ok(Json(list_response(query.filter.apply(reports))))
}

/// Delete a report (requires `confirm=true`)
#[utoipa::path(
    delete,
    path = "/api/reports/{id}",
    params(
        ("id" = Uuid, Path, description = "Report ID"),
        ConfirmQuery
    ),
    responses(
        (status = 200, description = "Report deleted", body = ApiResponse<Invalidation>),
        (status = 400, description = "Confirmation missing"),
        (status = 502, description = "Backend rejected the request")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn delete_report(
    _admin: RequireAdmin,
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
    Query(confirm): Query<ConfirmQuery>,
) -> Result<Json<ApiResponse<Invalidation>>> {
    confirm.require("delete this report")?;

    let invalidation = service.delete(id).await?;
    Ok(Json(ApiResponse::success(Some(invalidation), None, None)))
}

/// Mark a report as verified or unverified
#[utoipa::path(
    post,
    path = "/api/reports/{id}/verified",
    params(("id" = Uuid, Path, description = "Report ID")),
    request_body = ToggleDto,
    responses(
        (status = 200, description = "Report updated", body = ApiResponse<Invalidation>),
        (status = 502, description = "Backend rejected the request")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn set_report_verified(
    _admin: RequireAdmin,
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
    AppJson(toggle): AppJson<ToggleDto>,
) -> Result<Json<ApiResponse<Invalidation>>> {
    let invalidation = service.toggle_verified(id, toggle.value).await?;
    Ok(Json(ApiResponse::success(Some(invalidation), None, None)))
}

/// Flag or unflag a report
#[utoipa::path(
    post,
    path = "/api/reports/{id}/flagged",
    params(("id" = Uuid, Path, description = "Report ID")),
    request_body = ToggleDto,
    responses(
        (status = 200, description = "Report updated", body = ApiResponse<Invalidation>),
        (status = 502, description = "Backend rejected the request")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn set_report_flagged(
    _admin: RequireAdmin,
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
    AppJson(toggle): AppJson<ToggleDto>,
) -> Result<Json<ApiResponse<Invalidation>>> {
    let invalidation = service.toggle_flagged(id, toggle.value).await?;
    Ok(Json(ApiResponse::success(Some(invalidation), None, None)))
}
