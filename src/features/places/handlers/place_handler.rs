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
use crate::features::places::dtos::{CreatePlaceDto, UpdatePlaceDto};
use crate::features::places::models::Place;
use crate::features::places::services::PlaceService;
use crate::shared::invalidation::Invalidation;
use crate::shared::types::{list_response, ApiResponse, ConfirmQuery, ToggleDto};

/// List all places, newest first, with their category
#[utoipa::path(
    get,
    path = "/api/places",
    responses(
        (status = 200, description = "List of places", body = ApiResponse<Vec<Place>>),
        (status = 502, description = "Backend rejected the request")
    ),
    tag = "places",
    security(("bearer_auth" = []))
)]
pub async fn list_places(
    _admin: RequireAdmin,
    State(service): State<Arc<PlaceService>>,
) -> Result<Json<ApiResponse<Vec<Place>>>> {
    let places = service.list().await?;
    Ok(Json(list_response(places)))
}

/// Create a place
#[utoipa::path(
    post,
    path = "/api/places",
    request_body = CreatePlaceDto,
    responses(
        (status = 201, description = "Place created", body = ApiResponse<Invalidation>),
        (status = 400, description = "Missing required fields"),
        (status = 502, description = "Backend rejected the request")
    ),
    tag = "places",
    security(("bearer_auth" = []))
)]
pub async fn create_place(
    _admin: RequireAdmin,
    State(service): State<Arc<PlaceService>>,
    AppJson(dto): AppJson<CreatePlaceDto>,
) -> Result<(StatusCode, Json<ApiResponse<Invalidation>>)> {
    dto.validate()?;

    let invalidation = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(invalidation), None, None)),
    ))
}

/// Update the provided fields of a place
#[utoipa::path(
    patch,
    path = "/api/places/{id}",
    params(("id" = Uuid, Path, description = "Place ID")),
    request_body = UpdatePlaceDto,
    responses(
        (status = 200, description = "Place updated", body = ApiResponse<Invalidation>),
        (status = 400, description = "Validation error"),
        (status = 502, description = "Backend rejected the request")
    ),
    tag = "places",
    security(("bearer_auth" = []))
)]
pub async fn update_place(
    _admin: RequireAdmin,
    State(service): State<Arc<PlaceService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdatePlaceDto>,
) -> Result<Json<ApiResponse<Invalidation>>> {
    dto.validate()?;

    let invalidation = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(invalidation), None, None)))
}

/// Delete a place and, through the backend cascade, all of its reports
#[utoipa::path(
    delete,
    path = "/api/places/{id}",
    params(
        ("id" = Uuid, Path, description = "Place ID"),
        ConfirmQuery
    ),
    responses(
        (status = 200, description = "Place deleted", body = ApiResponse<Invalidation>),
        (status = 400, description = "Confirmation missing"),
        (status = 502, description = "Backend rejected the request")
    ),
    tag = "places",
    security(("bearer_auth" = []))
)]
pub async fn delete_place(
    _admin: RequireAdmin,
    State(service): State<Arc<PlaceService>>,
    Path(id): Path<Uuid>,
    Query(confirm): Query<ConfirmQuery>,
) -> Result<Json<ApiResponse<Invalidation>>> {
    confirm.require("delete this place and all of its reports")?;

    let invalidation = service.delete(id).await?;
    Ok(Json(ApiResponse::success(Some(invalidation), None, None)))
}

/// Activate or deactivate a place
#[utoipa::path(
    post,
    path = "/api/places/{id}/active",
    params(("id" = Uuid, Path, description = "Place ID")),
    request_body = ToggleDto,
    responses(
        (status = 200, description = "Place updated", body = ApiResponse<Invalidation>),
        (status = 502, description = "Backend rejected the request")
    ),
    tag = "places",
    security(("bearer_auth" = []))
)]
pub async fn set_place_active(
    _admin: RequireAdmin,
    State(service): State<Arc<PlaceService>>,
    Path(id): Path<Uuid>,
    AppJson(toggle): AppJson<ToggleDto>,
) -> Result<Json<ApiResponse<Invalidation>>> {
    let invalidation = service.toggle_active(id, toggle.value).await?;
    Ok(Json(ApiResponse::success(Some(invalidation), None, None)))
}
