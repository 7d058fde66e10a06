use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::places::models::Place;
use crate::features::reports::models::Report;

// ============================================================================
// Statistics
// ============================================================================

/// Per-category rollup of the places assigned to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategorySummary {
    pub id: Uuid,
    pub name: String,
    pub name_ar: String,
    pub place_count: usize,
    /// Sum of the places' report counts
    pub report_count: i64,
    /// Mean of the places' average waits, rounded; 0 without places
    pub avg_wait: i64,
}

/// Global counters shown at the top of the statistics view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Overview {
    pub active_places: usize,
    pub total_places: usize,
    pub total_reports: usize,
    pub verified_reports: usize,
    pub overall_avg_wait: i64,
    /// Reports created within the trailing window
    pub recent_report_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatsDto {
    pub overview: Overview,
    pub categories: Vec<CategorySummary>,
    pub top_places_by_wait: Vec<Place>,
    pub top_places_by_reports: Vec<Place>,
    /// Collections that failed to load; the figures above exclude them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

// ============================================================================
// Dashboard summary
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardSummaryDto {
    pub active_categories: usize,
    pub total_categories: usize,
    pub active_places: usize,
    pub total_places: usize,
    pub total_reports: usize,
    pub verified_reports: usize,
    pub overall_avg_wait: i64,
    /// Newest places
    pub recent_places: Vec<Place>,
    /// Newest reports
    pub recent_reports: Vec<Report>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}
