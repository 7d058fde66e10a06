use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Place columns embedded into each listed report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PlaceSummary {
    pub id: Uuid,
    pub name: String,
    pub city: String,
}

/// User-submitted wait-time observation (`reports` table)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Report {
    pub id: Uuid,
    pub place_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<PlaceSummary>,
    pub arrival_time: DateTime<Utc>,
    #[serde(default)]
    pub served_time: Option<DateTime<Utc>>,
    pub wait_minutes: i32,
    /// Deduplication fingerprint written by the reporting client; stored as-is
    #[serde(default)]
    pub source_hash: String,
    pub is_flagged: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Moderation view over a report listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportFilter {
    #[default]
    All,
    Verified,
    Flagged,
}

impl ReportFilter {
    pub fn matches(&self, report: &Report) -> bool {
        match self {
            ReportFilter::All => true,
            ReportFilter::Verified => report.is_verified,
            ReportFilter::Flagged => report.is_flagged,
        }
    }

    /// Keep only the reports visible under this filter, preserving order
    pub fn apply(&self, reports: Vec<Report>) -> Vec<Report> {
        reports.into_iter().filter(|r| self.matches(r)).collect()
    }
}
