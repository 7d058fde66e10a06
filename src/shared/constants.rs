/// Maximum number of reports returned by a report listing
pub const REPORT_LIST_LIMIT: usize = 100;

/// Number of entries in each statistics leaderboard
pub const LEADERBOARD_SIZE: usize = 5;

/// Trailing window, in days, for the "recent reports" count
pub const RECENT_WINDOW_DAYS: i64 = 7;

/// Number of latest places/reports shown on the dashboard
pub const DASHBOARD_RECENT_ITEMS: usize = 5;

// =============================================================================
// TABLE NAMES
// =============================================================================

pub const TABLE_CATEGORIES: &str = "categories";
pub const TABLE_PLACES: &str = "places";
pub const TABLE_REPORTS: &str = "reports";
pub const TABLE_ADMINS: &str = "admins";
