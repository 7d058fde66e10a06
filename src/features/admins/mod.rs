pub mod dtos;
pub mod handlers;
pub mod models;
pub mod provisioning;
pub mod routes;
pub mod services;

pub use services::AdminService;
