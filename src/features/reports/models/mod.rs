mod report;

pub use report::{PlaceSummary, Report, ReportFilter};
