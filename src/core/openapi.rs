use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::admins::{
    dtos as admins_dtos, handlers as admins_handlers, models as admins_models,
};
use crate::features::auth;
use crate::features::categories::{
    dtos as categories_dtos, handlers as categories_handlers, models as categories_models,
};
use crate::features::dashboard::{dtos as dashboard_dtos, handlers as dashboard_handlers};
use crate::features::places::{
    dtos as places_dtos, handlers as places_handlers, models as places_models,
};
use crate::features::reports::{handlers as reports_handlers, models as reports_models};
use crate::shared::invalidation::{Collection, Invalidation};
use crate::shared::types::{ApiResponse, Meta, ToggleDto};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::login,
        auth::handlers::refresh_token,
        auth::handlers::logout,
        auth::handlers::get_me,
        // Categories
        categories_handlers::list_categories,
        categories_handlers::create_category,
        categories_handlers::update_category,
        categories_handlers::delete_category,
        categories_handlers::set_category_active,
        // Places
        places_handlers::list_places,
        places_handlers::create_place,
        places_handlers::update_place,
        places_handlers::delete_place,
        places_handlers::set_place_active,
        // Reports
        reports_handlers::list_reports,
        reports_handlers::delete_report,
        reports_handlers::set_report_verified,
        reports_handlers::set_report_flagged,
        // Admins
        admins_handlers::list_admins,
        admins_handlers::upsert_admin,
        admins_handlers::delete_admin,
        // Dashboard
        dashboard_handlers::get_dashboard,
        dashboard_handlers::get_stats,
    ),
    components(
        schemas(
            // Shared
            Meta,
            ToggleDto,
            Collection,
            Invalidation,
            ApiResponse<Invalidation>,
            // Auth
            auth::AuthUser,
            auth::AuthSession,
            auth::model::SessionState,
            auth::dtos::LoginRequestDto,
            auth::dtos::LoginResponseDto,
            auth::dtos::RefreshTokenRequestDto,
            ApiResponse<auth::dtos::LoginResponseDto>,
            ApiResponse<auth::model::SessionState>,
            // Categories
            categories_models::Category,
            categories_dtos::CreateCategoryDto,
            categories_dtos::UpdateCategoryDto,
            ApiResponse<Vec<categories_models::Category>>,
            // Places
            places_models::Place,
            places_dtos::CreatePlaceDto,
            places_dtos::UpdatePlaceDto,
            ApiResponse<Vec<places_models::Place>>,
            // Reports
            reports_models::PlaceSummary,
            reports_models::Report,
            reports_models::ReportFilter,
            ApiResponse<Vec<reports_models::Report>>,
            // Admins
            admins_models::AdminRole,
            admins_models::Admin,
            admins_dtos::AdminFormData,
            ApiResponse<Vec<admins_models::Admin>>,
            // Dashboard
            dashboard_dtos::CategorySummary,
            dashboard_dtos::Overview,
            dashboard_dtos::StatsDto,
            dashboard_dtos::DashboardSummaryDto,
            ApiResponse<dashboard_dtos::StatsDto>,
            ApiResponse<dashboard_dtos::DashboardSummaryDto>,
        )
    ),
    tags(
        (name = "auth", description = "Admin sign-in and session"),
        (name = "categories", description = "Place categories"),
        (name = "places", description = "Places where waits are reported"),
        (name = "reports", description = "Wait-time report moderation"),
        (name = "admins", description = "Admin role grants"),
        (name = "dashboard", description = "Dashboard summary and statistics"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Nobti Admin API",
        version = "0.1.0",
        description = "Administration API for the Nobti wait-time service",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
