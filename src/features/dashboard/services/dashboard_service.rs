use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::features::categories::models::Category;
use crate::features::categories::CategoryService;
use crate::features::dashboard::aggregator;
use crate::features::dashboard::dtos::{DashboardSummaryDto, StatsDto};
use crate::features::places::models::Place;
use crate::features::places::PlaceService;
use crate::features::reports::models::Report;
use crate::features::reports::ReportService;
use crate::shared::constants::LEADERBOARD_SIZE;
use crate::shared::resource::ResourceState;

/// The three collections the dashboard derives its figures from
struct Snapshot {
    categories: ResourceState<Category>,
    places: ResourceState<Place>,
    reports: ResourceState<Report>,
}

impl Snapshot {
    fn warnings(&self) -> Vec<String> {
        [
            ("categories", self.categories.error()),
            ("places", self.places.error()),
            ("reports", self.reports.error()),
        ]
        .into_iter()
        .filter_map(|(name, error)| error.map(|e| format!("Failed to load {}: {}", name, e)))
        .collect()
    }
}

/// Service for the dashboard and statistics views
pub struct DashboardService {
    categories: Arc<CategoryService>,
    places: Arc<PlaceService>,
    reports: Arc<ReportService>,
}

impl DashboardService {
    pub fn new(
        categories: Arc<CategoryService>,
        places: Arc<PlaceService>,
        reports: Arc<ReportService>,
    ) -> Self {
        Self {
            categories,
            places,
            reports,
        }
    }

    /// Fetch all three collections independently; a failed fetch leaves its
    /// collection empty and is reported as a warning
    async fn load(&self) -> Snapshot {
        let mut snapshot = Snapshot {
            categories: ResourceState::new(),
            places: ResourceState::new(),
            reports: ResourceState::new(),
        };

        tokio::join!(
            snapshot.categories.refresh(self.categories.list()),
            snapshot.places.refresh(self.places.list()),
            snapshot.reports.refresh(self.reports.list(None)),
        );

        snapshot
    }

    /// Statistics view; the recency window counts from `now`
    pub async fn get_stats(&self, now: DateTime<Utc>) -> StatsDto {
        let snapshot = self.load().await;
        let places = snapshot.places.items();
        let reports = snapshot.reports.items();

        StatsDto {
            overview: aggregator::overview(places, reports, now),
            categories: aggregator::category_summaries(snapshot.categories.items(), places),
            top_places_by_wait: aggregator::top_places_by_wait(places, LEADERBOARD_SIZE),
            top_places_by_reports: aggregator::top_places_by_reports(places, LEADERBOARD_SIZE),
            warnings: snapshot.warnings(),
        }
    }

    pub async fn get_summary(&self) -> DashboardSummaryDto {
        let snapshot = self.load().await;

        let mut summary = aggregator::dashboard_summary(
            snapshot.categories.items(),
            snapshot.places.items(),
            snapshot.reports.items(),
        );
        summary.warnings = snapshot.warnings();
        summary
    }
}
