use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::core::config::SupabaseConfig;
use crate::features::auth::provider::{
    AuthError, AuthEvent, AuthProvider, AuthSession, AuthUser, UserDirectory,
};

/// Page size used when scanning the user directory
const USERS_PER_PAGE: usize = 200;

/// Error body returned by the auth service (older and newer shapes)
#[derive(Debug, Deserialize)]
struct AuthErrorResponse {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl AuthErrorResponse {
    fn into_message(self) -> Option<String> {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .filter(|m| !m.is_empty())
    }
}

#[derive(Debug, Serialize)]
struct PasswordGrantRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RefreshGrantRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateUserRequest<'a> {
    email: &'a str,
    password: &'a str,
    email_confirm: bool,
}

#[derive(Debug, Deserialize)]
struct UserListResponse {
    #[serde(default)]
    users: Vec<AuthUser>,
}

/// Client for the backend's GoTrue auth endpoint (`/auth/v1`)
pub struct SupabaseAuthClient {
    auth_url: String,
    anon_key: String,
    service_role_key: String,
    http_client: reqwest::Client,
    events: broadcast::Sender<AuthEvent>,
}

impl SupabaseAuthClient {
    pub fn new(config: &SupabaseConfig) -> Self {
        let (events, _) = broadcast::channel(32);
        Self {
            auth_url: config.auth_url(),
            anon_key: config.anon_key.clone(),
            service_role_key: config.service_role_key.clone(),
            http_client: reqwest::Client::new(),
            events,
        }
    }

    fn emit(&self, event: AuthEvent) {
        // No receivers is fine: nobody is tracking a session right now
        let _ = self.events.send(event);
    }

    async fn error_message(response: reqwest::Response) -> (u16, String) {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<AuthErrorResponse>(&body)
            .ok()
            .and_then(AuthErrorResponse::into_message)
            .unwrap_or_else(|| format!("HTTP {}", status));
        (status.as_u16(), message)
    }

    async fn token_grant<B: Serialize>(
        &self,
        grant_type: &str,
        body: &B,
    ) -> Result<AuthSession, AuthError> {
        let url = format!("{}/token", self.auth_url);

        let response = self
            .http_client
            .post(&url)
            .query(&[("grant_type", grant_type)])
            .header("apikey", &self.anon_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Auth token request failed: {}", e);
                AuthError::Request(e.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<AuthSession>()
                .await
                .map_err(|e| AuthError::Decode(e.to_string()));
        }

        let (code, message) = Self::error_message(response).await;
        if matches!(code, 400 | 401 | 422) {
            return Err(AuthError::InvalidCredentials(message));
        }

        tracing::error!("Auth service error: HTTP {} - {}", code, message);
        Err(AuthError::Backend {
            status: code,
            message,
        })
    }

    async fn list_users_page(&self, page: usize) -> Result<Vec<AuthUser>, AuthError> {
        let url = format!("{}/admin/users", self.auth_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[("page", page), ("per_page", USERS_PER_PAGE)])
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .send()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let (status, message) = Self::error_message(response).await;
            return Err(AuthError::Backend { status, message });
        }

        let list = response
            .json::<UserListResponse>()
            .await
            .map_err(|e| AuthError::Decode(e.to_string()))?;

        Ok(list.users)
    }
}

#[async_trait]
impl AuthProvider for SupabaseAuthClient {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError> {
        tracing::debug!("Signing in: {}", email);

        let session = self
            .token_grant("password", &PasswordGrantRequest { email, password })
            .await?;

        tracing::info!("Signed in user {}", session.user.id);
        self.emit(AuthEvent::SignedIn(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let url = format!("{}/logout", self.auth_url);

        let response = self
            .http_client
            .post(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;

        // An already-invalid token is as good as signed out
        let status = response.status();
        if !status.is_success() && !matches!(status.as_u16(), 401 | 403 | 404) {
            let (status, message) = Self::error_message(response).await;
            return Err(AuthError::Backend { status, message });
        }

        self.emit(AuthEvent::SignedOut {
            access_token: access_token.to_string(),
        });
        Ok(())
    }

    async fn get_user(&self, access_token: &str) -> Result<Option<AuthUser>, AuthError> {
        let url = format!("{}/user", self.auth_url);

        let response = self
            .http_client
            .get(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;

        let status = response.status();
        if matches!(status.as_u16(), 401 | 403) {
            return Ok(None);
        }
        if !status.is_success() {
            let (status, message) = Self::error_message(response).await;
            return Err(AuthError::Backend { status, message });
        }

        response
            .json::<AuthUser>()
            .await
            .map(Some)
            .map_err(|e| AuthError::Decode(e.to_string()))
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, AuthError> {
        let session = self
            .token_grant("refresh_token", &RefreshGrantRequest { refresh_token })
            .await?;

        self.emit(AuthEvent::TokenRefreshed(session.clone()));
        Ok(session)
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}

#[async_trait]
impl UserDirectory for SupabaseAuthClient {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        tracing::debug!("Searching for user by email: {}", email);

        let mut page = 1;
        loop {
            let users = self.list_users_page(page).await?;
            let exhausted = users.len() < USERS_PER_PAGE;

            if let Some(user) = users
                .into_iter()
                .find(|u| u.email.as_deref() == Some(email))
            {
                return Ok(Some(user));
            }

            if exhausted {
                return Ok(None);
            }
            page += 1;
        }
    }

    async fn create_user(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let url = format!("{}/admin/users", self.auth_url);

        let response = self
            .http_client
            .post(&url)
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .json(&CreateUserRequest {
                email,
                password,
                email_confirm: true,
            })
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to create user: {}", e);
                AuthError::Request(e.to_string())
            })?;

        if !response.status().is_success() {
            let (status, message) = Self::error_message(response).await;
            return Err(AuthError::Backend { status, message });
        }

        let user = response
            .json::<AuthUser>()
            .await
            .map_err(|e| AuthError::Decode(e.to_string()))?;

        tracing::info!("Created auth user: {}", user.id);
        Ok(user)
    }
}
