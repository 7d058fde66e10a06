use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Place category row (`categories` table)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    /// English name
    pub name: String,
    /// Arabic name
    pub name_ar: String,
    #[serde(default)]
    pub icon: Option<String>,
    pub is_active: bool,
    /// Ascending sort key, not unique
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
