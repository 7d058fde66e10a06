use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::core::error::{AppError, Result};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub meta: Option<Meta>,
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Meta {
    pub total: i64,
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>, meta: Option<Meta>) -> Self {
        Self {
            success: true,
            data,
            message,
            meta,
            errors: None,
        }
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            meta: None,
            errors,
        }
    }
}

/// Wraps a full collection with its size in `meta.total`
pub fn list_response<T>(items: Vec<T>) -> ApiResponse<Vec<T>> {
    let total = items.len() as i64;
    ApiResponse::success(Some(items), None, Some(Meta { total }))
}

/// Request body for the active/verified/flagged toggles
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct ToggleDto {
    pub value: bool,
}

// =============================================================================
// CONFIRMATION
// =============================================================================

/// Explicit confirmation flag required on destructive requests
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ConfirmQuery {
    /// Must be `true` for the action to be issued
    #[serde(default)]
    pub confirm: bool,
}

impl ConfirmQuery {
    pub fn require(&self, action: &str) -> Result<()> {
        if self.confirm {
            Ok(())
        } else {
            Err(AppError::BadRequest(format!(
                "Confirmation required to {} (pass confirm=true)",
                action
            )))
        }
    }
}
