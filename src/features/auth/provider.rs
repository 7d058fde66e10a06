use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::error::AppError;

/// Identity issued by the authentication service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub expires_in: u64,
    pub user: AuthUser,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Session-change notification pushed by the provider
#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    SignedIn(AuthSession),
    SignedOut { access_token: String },
    TokenRefreshed(AuthSession),
    UserUpdated(AuthUser),
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Credential pair rejected
    #[error("{0}")]
    InvalidCredentials(String),

    #[error("Auth request failed: {0}")]
    Request(String),

    #[error("Auth service error: HTTP {status} - {message}")]
    Backend { status: u16, message: String },

    #[error("Failed to parse auth response: {0}")]
    Decode(String),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials(msg) => AppError::Auth(msg),
            other => AppError::ExternalServiceError(other.to_string()),
        }
    }
}

/// End-user session operations of the authentication service
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;

    /// Resolves an access token; `None` when the token is unknown or expired
    async fn get_user(&self, access_token: &str) -> Result<Option<AuthUser>, AuthError>;

    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, AuthError>;

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;
}

/// Service-role user management, used to provision admin accounts
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError>;

    /// Creates a user with a confirmed email address
    async fn create_user(&self, email: &str, password: &str) -> Result<AuthUser, AuthError>;
}
