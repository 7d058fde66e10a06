use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::admins::dtos::AdminFormData;
use crate::features::admins::models::Admin;
use crate::features::admins::services::AdminService;
use crate::features::auth::guards::RequireAdmin;
use crate::shared::invalidation::Invalidation;
use crate::shared::types::{list_response, ApiResponse, ConfirmQuery};

/// List all admins
#[utoipa::path(
    get,
    path = "/api/admins",
    responses(
        (status = 200, description = "List of admins", body = ApiResponse<Vec<Admin>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    tag = "admins",
    security(("bearer_auth" = []))
)]
pub async fn list_admins(
    _admin: RequireAdmin,
    State(service): State<Arc<AdminService>>,
) -> Result<Json<ApiResponse<Vec<Admin>>>> {
    let admins = service.list().await?;
    Ok(Json(list_response(admins)))
}

/// Grant admin access to a user, or change the role of an existing admin
#[utoipa::path(
    post,
    path = "/api/admins",
    request_body = AdminFormData,
    responses(
        (status = 200, description = "Admin granted", body = ApiResponse<Invalidation>),
        (status = 400, description = "Missing required fields"),
        (status = 502, description = "Backend rejected the request")
    ),
    tag = "admins",
    security(("bearer_auth" = []))
)]
pub async fn upsert_admin(
    _admin: RequireAdmin,
    State(service): State<Arc<AdminService>>,
    AppJson(form): AppJson<AdminFormData>,
) -> Result<Json<ApiResponse<Invalidation>>> {
    form.validate()?;
    let user_id = form
        .user_id
        .ok_or_else(|| AppError::Validation("Missing required fields: user_id".to_string()))?;

    let invalidation = service.upsert(user_id, form.role).await?;
    Ok(Json(ApiResponse::success(Some(invalidation), None, None)))
}

/// Revoke an admin grant (requires `confirm=true`)
#[utoipa::path(
    delete,
    path = "/api/admins/{id}",
    params(
        ("id" = Uuid, Path, description = "Admin ID"),
        ConfirmQuery
    ),
    responses(
        (status = 200, description = "Admin removed", body = ApiResponse<Invalidation>),
        (status = 400, description = "Confirmation missing"),
        (status = 502, description = "Backend rejected the request")
    ),
    tag = "admins",
    security(("bearer_auth" = []))
)]
pub async fn delete_admin(
    _admin: RequireAdmin,
    State(service): State<Arc<AdminService>>,
    Path(id): Path<Uuid>,
    Query(confirm): Query<ConfirmQuery>,
) -> Result<Json<ApiResponse<Invalidation>>> {
    confirm.require("remove this admin")?;

    let invalidation = service.delete(id).await?;
    Ok(Json(ApiResponse::success(Some(invalidation), None, None)))
}
