use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::admins::models::AdminRole;

/// Grant or promote an admin; an existing row for `user_id` is overwritten
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AdminFormData {
    #[validate(required)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub role: AdminRole,
}
