use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::categories::dtos::{CreateCategoryDto, UpdateCategoryDto};
use crate::features::categories::models::Category;
use crate::features::categories::services::CategoryService;
use crate::shared::invalidation::Invalidation;
use crate::shared::types::{list_response, ApiResponse, ConfirmQuery, ToggleDto};

/// List all categories ordered by display order
#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "List of categories", body = ApiResponse<Vec<Category>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 502, description = "Backend rejected the request")
    ),
    tag = "categories",
    security(("bearer_auth" = []))
)]
pub async fn list_categories(
    _admin: RequireAdmin,
    State(service): State<Arc<CategoryService>>,
) -> Result<Json<ApiResponse<Vec<Category>>>> {
    let categories = service.list().await?;
    Ok(Json(list_response(categories)))
}

/// Create a category
#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CreateCategoryDto,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<Invalidation>),
        (status = 400, description = "Missing required fields"),
        (status = 502, description = "Backend rejected the request")
    ),
    tag = "categories",
    security(("bearer_auth" = []))
)]
pub async fn create_category(
    _admin: RequireAdmin,
    State(service): State<Arc<CategoryService>>,
    AppJson(dto): AppJson<CreateCategoryDto>,
) -> Result<(StatusCode, Json<ApiResponse<Invalidation>>)> {
    dto.validate()?;

    let invalidation = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(invalidation), None, None)),
    ))
}

/// Update the provided fields of a category
#[utoipa::path(
    patch,
    path = "/api/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = UpdateCategoryDto,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<Invalidation>),
        (status = 400, description = "Validation error"),
        (status = 502, description = "Backend rejected the request")
    ),
    tag = "categories",
    security(("bearer_auth" = []))
)]
pub async fn update_category(
    _admin: RequireAdmin,
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateCategoryDto>,
) -> Result<Json<ApiResponse<Invalidation>>> {
    dto.validate()?;

    let invalidation = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(invalidation), None, None)))
}

/// Delete a category (requires `confirm=true`)
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category ID"),
        ConfirmQuery
    ),
    responses(
        (status = 200, description = "Category deleted", body = ApiResponse<Invalidation>),
        (status = 400, description = "Confirmation missing"),
        (status = 502, description = "Backend rejected the request")
    ),
    tag = "categories",
    security(("bearer_auth" = []))
)]
pub async fn delete_category(
    _admin: RequireAdmin,
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
    Query(confirm): Query<ConfirmQuery>,
) -> Result<Json<ApiResponse<Invalidation>>> {
    confirm.require("delete this category")?;

    let invalidation = service.delete(id).await?;
    Ok(Json(ApiResponse::success(Some(invalidation), None, None)))
}

/// Activate or deactivate a category
#[utoipa::path(
    post,
    path = "/api/categories/{id}/active",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = ToggleDto,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<Invalidation>),
        (status = 502, description = "Backend rejected the request")
    ),
    tag = "categories",
    security(("bearer_auth" = []))
)]
pub async fn set_category_active(
    _admin: RequireAdmin,
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
    AppJson(toggle): AppJson<ToggleDto>,
) -> Result<Json<ApiResponse<Invalidation>>> {
    let invalidation = service.toggle_active(id, toggle.value).await?;
    Ok(Json(ApiResponse::success(Some(invalidation), None, None)))
}
