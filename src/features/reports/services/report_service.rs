use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::Report;
use crate::modules::store::{decode_rows, Filter, Query, TableStore};
use crate::shared::constants::{REPORT_LIST_LIMIT, TABLE_PLACES, TABLE_REPORTS};
use crate::shared::invalidation::{Collection, Invalidation};

/// Service for report moderation
pub struct ReportService {
    store: Arc<dyn TableStore>,
}

impl ReportService {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self { store }
    }

    /// List the newest reports, optionally for one place, with the place
    /// summary embedded. Capped at [`REPORT_LIST_LIMIT`] rows.
    pub async fn list(&self, place_id: Option<Uuid>) -> Result<Vec<Report>> {
        let mut query = Query::new()
            .embed("place", TABLE_PLACES, "place_id", &["id", "name", "city"])
            .order("created_at", false)
            .limit(REPORT_LIST_LIMIT);
        if let Some(place_id) = place_id {
            query = query.eq("place_id", place_id);
        }

        let reports: Vec<Report> = self
            .store
            .select(TABLE_REPORTS, &query)
            .await
            .and_then(decode_rows)
            .map_err(|e| {
                tracing::error!("Failed to list reports: {}", e);
                AppError::Fetch(e.to_string())
            })?;

        Ok(reports)
    }

    pub async fn delete(&self, id: Uuid) -> Result<Invalidation> {
        self.store
            .delete(TABLE_REPORTS, &[Filter::eq("id", id)])
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete report {}: {}", id, e);
                AppError::Mutation(e.to_string())
            })?;

        tracing::info!("Report {} deleted", id);
        Ok(Self::invalidation())
    }

    pub async fn toggle_verified(&self, id: Uuid, is_verified: bool) -> Result<Invalidation> {
        self.set_flag(id, "is_verified", is_verified).await
    }

    pub async fn toggle_flagged(&self, id: Uuid, is_flagged: bool) -> Result<Invalidation> {
        self.set_flag(id, "is_flagged", is_flagged).await
    }

    /// Write a single moderation column; reports carry no `updated_at`
    async fn set_flag(&self, id: Uuid, column: &str, value: bool) -> Result<Invalidation> {
        self.store
            .update(TABLE_REPORTS, &[Filter::eq("id", id)], json!({ column: value }))
            .await
            .map_err(|e| {
                tracing::error!("Failed to set {} on report {}: {}", column, id, e);
                AppError::Mutation(e.to_string())
            })?;

        Ok(Self::invalidation())
    }

    // Place aggregates are recomputed by the backend from reports
    fn invalidation() -> Invalidation {
        Invalidation::of(&[Collection::Reports, Collection::Places])
    }
}
