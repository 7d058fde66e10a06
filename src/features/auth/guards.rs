//! Authorization guard for the admin dashboard.
//!
//! `auth_middleware` places the resolved [`SessionState`] in the request
//! extensions; [`RequireAdmin`] admits only sessions holding an admin grant.
//! The `admin` and `superadmin` roles are treated alike.

use crate::core::error::AppError;
use crate::features::admins::models::Admin;
use crate::features::auth::model::SessionState;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Guard for checking if the caller is an admin.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireAdmin(admin): RequireAdmin) { ... }
/// ```
pub struct RequireAdmin(pub Admin);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<SessionState>() {
            Some(SessionState::AuthenticatedAdmin { admin, .. }) => Ok(RequireAdmin(admin.clone())),
            Some(SessionState::AuthenticatedNonAdmin { .. }) => {
                Err(AppError::Forbidden("Admin access required".to_string()))
            }
            Some(SessionState::Unauthenticated) | None => Err(AppError::Unauthorized(
                "User not authenticated".to_string(),
            )),
        }
    }
}
