//! Derived statistics over already-fetched collections.
//!
//! Everything here is pure and synchronous: no I/O, no clock reads. The
//! current instant is passed in explicitly where a time window applies.

use std::cmp::Ordering;

use chrono::{DateTime, Duration, Utc};

use crate::features::categories::models::Category;
use crate::features::dashboard::dtos::{CategorySummary, DashboardSummaryDto, Overview};
use crate::features::places::models::Place;
use crate::features::reports::models::Report;
use crate::shared::constants::{DASHBOARD_RECENT_ITEMS, RECENT_WINDOW_DAYS};

/// Mean `avg_wait_minutes` rounded half away from zero; 0 for no places
pub fn average_wait<'a, I>(places: I) -> i64
where
    I: IntoIterator<Item = &'a Place>,
{
    let (sum, count) = places
        .into_iter()
        .fold((0.0_f64, 0_usize), |(sum, count), place| {
            (sum + place.avg_wait_minutes, count + 1)
        });

    if count == 0 {
        return 0;
    }
    (sum / count as f64).round() as i64
}

/// One summary per category, in input order
pub fn category_summaries(categories: &[Category], places: &[Place]) -> Vec<CategorySummary> {
    categories
        .iter()
        .map(|category| {
            let members: Vec<&Place> = places
                .iter()
                .filter(|p| p.category_id == category.id)
                .collect();

            CategorySummary {
                id: category.id,
                name: category.name.clone(),
                name_ar: category.name_ar.clone(),
                place_count: members.len(),
                report_count: members.iter().map(|p| p.report_count).sum(),
                avg_wait: average_wait(members.iter().copied()),
            }
        })
        .collect()
}

/// The `n` places with the longest average wait; ties keep input order
pub fn top_places_by_wait(places: &[Place], n: usize) -> Vec<Place> {
    top_by(places, n, |a, b| b.avg_wait_minutes.total_cmp(&a.avg_wait_minutes))
}

/// The `n` places with the most reports; ties keep input order
pub fn top_places_by_reports(places: &[Place], n: usize) -> Vec<Place> {
    top_by(places, n, |a, b| b.report_count.cmp(&a.report_count))
}

fn top_by<F>(places: &[Place], n: usize, compare: F) -> Vec<Place>
where
    F: FnMut(&Place, &Place) -> Ordering,
{
    let mut ranked = places.to_vec();
    // `sort_by` is stable
    ranked.sort_by(compare);
    ranked.truncate(n);
    ranked
}

/// Reports created at or after `now - days`
pub fn recent_reports(reports: &[Report], now: DateTime<Utc>, days: i64) -> Vec<&Report> {
    let cutoff = now - Duration::days(days);
    reports.iter().filter(|r| r.created_at >= cutoff).collect()
}

pub fn overview(places: &[Place], reports: &[Report], now: DateTime<Utc>) -> Overview {
    Overview {
        active_places: places.iter().filter(|p| p.is_active).count(),
        total_places: places.len(),
        total_reports: reports.len(),
        verified_reports: reports.iter().filter(|r| r.is_verified).count(),
        overall_avg_wait: average_wait(places),
        recent_report_count: recent_reports(reports, now, RECENT_WINDOW_DAYS).len(),
    }
}

/// Landing-page counters plus the newest places and reports.
///
/// `places` and `reports` are expected newest first, as listed.
pub fn dashboard_summary(
    categories: &[Category],
    places: &[Place],
    reports: &[Report],
) -> DashboardSummaryDto {
    DashboardSummaryDto {
        active_categories: categories.iter().filter(|c| c.is_active).count(),
        total_categories: categories.len(),
        active_places: places.iter().filter(|p| p.is_active).count(),
        total_places: places.len(),
        total_reports: reports.len(),
        verified_reports: reports.iter().filter(|r| r.is_verified).count(),
        overall_avg_wait: average_wait(places),
        recent_places: places.iter().take(DASHBOARD_RECENT_ITEMS).cloned().collect(),
        recent_reports: reports.iter().take(DASHBOARD_RECENT_ITEMS).cloned().collect(),
        warnings: Vec::new(),
    }
}
