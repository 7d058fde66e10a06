pub mod admins;
pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod places;
pub mod reports;
