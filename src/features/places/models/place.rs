use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::categories::models::Category;

/// Backend aggregates are NULL until the first report lands
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Monitored location row (`places` table).
///
/// `avg_wait_minutes`, `report_count`, `last_report_at` and
/// `confidence_score` are maintained by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Place {
    pub id: Uuid,
    pub name: String,
    pub city: String,
    pub category_id: Uuid,
    /// Embedded on listing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default)]
    pub address: Option<String>,
    pub is_active: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub avg_wait_minutes: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub report_count: i64,
    #[serde(default)]
    pub last_report_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub confidence_score: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
