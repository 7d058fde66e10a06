pub mod clients;
pub mod dtos;
pub mod guards;
pub mod handlers;
pub mod model;
pub mod provider;
pub mod routes;
pub mod services;
pub mod session;

pub use provider::{AuthError, AuthEvent, AuthProvider, AuthSession, AuthUser, UserDirectory};
pub use services::AuthService;
pub use session::SessionContext;
