use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, BearerToken};
use crate::features::auth::dtos::{LoginRequestDto, LoginResponseDto, RefreshTokenRequestDto};
use crate::features::auth::model::SessionState;
use crate::features::auth::services::AuthService;
use crate::shared::types::ApiResponse;
use axum::{extract::State, Json};
use std::sync::Arc;
use validator::Validate;

/// Login with email and password
///
/// Non-admin users are signed in but receive a non-admin session; every
/// dashboard route rejects them.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<LoginRequestDto>,
) -> Result<Json<ApiResponse<LoginResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let response = service.login(dto).await?;
    Ok(Json(ApiResponse::success(Some(response), None, None)))
}

/// Refresh access token using refresh token
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshTokenRequestDto,
    responses(
        (status = 200, description = "Token refreshed successfully", body = ApiResponse<LoginResponseDto>),
        (status = 401, description = "Invalid or expired refresh token")
    ),
    tag = "auth"
)]
pub async fn refresh_token(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<RefreshTokenRequestDto>,
) -> Result<Json<ApiResponse<LoginResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let response = service.refresh_token(dto).await?;
    Ok(Json(ApiResponse::success(Some(response), None, None)))
}

/// Sign out the current session
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Signed out"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn logout(
    State(service): State<Arc<AuthService>>,
    BearerToken(token): BearerToken,
) -> Result<Json<ApiResponse<()>>> {
    service.logout(&token).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Signed out".to_string()),
        None,
    )))
}

/// Get the current session state
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current session", body = ApiResponse<SessionState>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(session: SessionState) -> Result<Json<ApiResponse<SessionState>>> {
    Ok(Json(ApiResponse::success(Some(session), None, None)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::admins::models::AdminRole;
    use crate::features::admins::AdminService;
    use crate::features::auth::routes;
    use crate::shared::test_helpers::{seed_admin_for, FakeAuthProvider, MemoryStore};
    use axum::http::StatusCode;
    use axum::Router;
    use axum_test::TestServer;
    use serde_json::json;

    fn server() -> (TestServer, Arc<FakeAuthProvider>, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::dashboard());
        let provider = Arc::new(FakeAuthProvider::new());
        let service = Arc::new(AuthService::new(
            provider.clone(),
            Arc::new(AdminService::new(store.clone())),
        ));
        let app = Router::new()
            .merge(routes::public_routes(Arc::clone(&service)))
            .merge(routes::protected_routes(service));
        (TestServer::new(app).unwrap(), provider, store)
    }

    #[tokio::test]
    async fn test_login_with_bad_password_is_unauthorized() {
        let (server, provider, _) = server();
        provider.add_user("admin@nobti.app", "secret");

        let response = server
            .post("/api/auth/login")
            .json(&json!({ "email": "admin@nobti.app", "password": "wrong" }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "Invalid login credentials");
    }

    #[tokio::test]
    async fn test_login_me_logout_flow() {
        let (server, provider, store) = server();
        let user = provider.add_user("admin@nobti.app", "secret");
        seed_admin_for(&store, user.id, AdminRole::Admin);

        let response = server
            .post("/api/auth/login")
            .json(&json!({ "email": "admin@nobti.app", "password": "secret" }))
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["data"]["session"]["status"], "authenticated_admin");
        let token = body["data"]["access_token"].as_str().unwrap().to_string();

        let me: serde_json::Value = server
            .get("/api/auth/me")
            .authorization_bearer(&token)
            .await
            .json();
        assert_eq!(me["data"]["admin"]["role"], "admin");

        server
            .post("/api/auth/logout")
            .authorization_bearer(&token)
            .await
            .assert_status_ok();

        server
            .get("/api/auth/me")
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_me_reports_non_admin() {
        let (server, provider, _) = server();
        let user = provider.add_user("viewer@nobti.app", "secret");
        let token = provider.issue_token(&user);

        let me: serde_json::Value = server
            .get("/api/auth/me")
            .authorization_bearer(token)
            .await
            .json();

        assert_eq!(me["data"]["status"], "authenticated_non_admin");
    }

    #[tokio::test]
    async fn test_login_rejects_malformed_email() {
        let (server, _, _) = server();

        let response = server
            .post("/api/auth/login")
            .json(&json!({ "email": "not-an-email", "password": "x" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
