use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::auth::model::SessionState;

/// Request DTO for admin login
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response DTO for login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponseDto {
    pub access_token: String,
    /// Token type (always "bearer")
    pub token_type: String,
    /// Token expiry time in seconds
    pub expires_in: u64,
    pub refresh_token: String,
    /// Resolved access level; non-admins are signed in but cannot use the dashboard
    pub session: SessionState,
}

/// Request DTO for token refresh
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RefreshTokenRequestDto {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}
