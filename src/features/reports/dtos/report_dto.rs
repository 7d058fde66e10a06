use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::features::reports::models::ReportFilter;

/// Query parameters for listing reports
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListReportsQuery {
    /// Only reports for this place
    pub place_id: Option<Uuid>,
    /// all (default), verified or flagged
    #[serde(default)]
    pub filter: ReportFilter,
}
