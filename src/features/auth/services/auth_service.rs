use std::sync::Arc;

use crate::core::error::Result;
use crate::features::admins::AdminService;
use crate::features::auth::dtos::{LoginRequestDto, LoginResponseDto, RefreshTokenRequestDto};
use crate::features::auth::model::SessionState;
use crate::features::auth::provider::{AuthProvider, AuthSession, AuthUser};

/// Resolves authenticated identities into admin sessions
pub struct AuthService {
    provider: Arc<dyn AuthProvider>,
    admins: Arc<AdminService>,
}

impl AuthService {
    pub fn new(provider: Arc<dyn AuthProvider>, admins: Arc<AdminService>) -> Self {
        Self { provider, admins }
    }

    /// Look up the admin grant for `user`.
    ///
    /// A missing grant and a failed lookup both resolve to
    /// [`SessionState::AuthenticatedNonAdmin`]; neither is an error.
    pub async fn resolve_user(&self, user: AuthUser) -> SessionState {
        match self.admins.find_by_user_id(user.id).await {
            Ok(Some(admin)) => SessionState::AuthenticatedAdmin { user, admin },
            Ok(None) => {
                tracing::debug!("User {} has no admin grant", user.id);
                SessionState::AuthenticatedNonAdmin { user }
            }
            Err(e) => {
                tracing::warn!("Admin lookup failed for user {}: {}", user.id, e);
                SessionState::AuthenticatedNonAdmin { user }
            }
        }
    }

    /// Resolve a bearer token; unknown or expired tokens are unauthenticated
    pub async fn resolve_token(&self, access_token: &str) -> Result<SessionState> {
        match self.provider.get_user(access_token).await? {
            Some(user) => Ok(self.resolve_user(user).await),
            None => Ok(SessionState::Unauthenticated),
        }
    }

    pub async fn login(&self, dto: LoginRequestDto) -> Result<LoginResponseDto> {
        let session = self
            .provider
            .sign_in_with_password(&dto.email, &dto.password)
            .await?;

        let state = self.resolve_user(session.user.clone()).await;
        if !state.is_admin() {
            tracing::info!("Signed in user {} is not an admin", session.user.id);
        }

        Ok(Self::login_response(session, state))
    }

    pub async fn refresh_token(&self, dto: RefreshTokenRequestDto) -> Result<LoginResponseDto> {
        let session = self.provider.refresh_session(&dto.refresh_token).await?;
        let state = self.resolve_user(session.user.clone()).await;
        Ok(Self::login_response(session, state))
    }

    pub async fn logout(&self, access_token: &str) -> Result<()> {
        self.provider.sign_out(access_token).await?;
        Ok(())
    }

    fn login_response(session: AuthSession, state: SessionState) -> LoginResponseDto {
        LoginResponseDto {
            access_token: session.access_token,
            token_type: session.token_type,
            expires_in: session.expires_in,
            refresh_token: session.refresh_token,
            session: state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AppError;
    use crate::features::admins::models::AdminRole;
    use crate::shared::test_helpers::{seed_admin_for, FakeAuthProvider, MemoryStore};

    fn service(store: Arc<MemoryStore>, provider: Arc<FakeAuthProvider>) -> AuthService {
        AuthService::new(provider, Arc::new(AdminService::new(store)))
    }

    #[tokio::test]
    async fn test_resolve_token_three_states() {
        let store = Arc::new(MemoryStore::dashboard());
        let provider = Arc::new(FakeAuthProvider::new());
        let admin_user = provider.add_user("admin@nobti.app", "secret");
        let plain_user = provider.add_user("viewer@nobti.app", "secret");
        seed_admin_for(&store, admin_user.id, AdminRole::Superadmin);
        let admin_token = provider.issue_token(&admin_user);
        let plain_token = provider.issue_token(&plain_user);
        let service = service(store, provider);

        let state = service.resolve_token(&admin_token).await.unwrap();
        assert!(matches!(
            state,
            SessionState::AuthenticatedAdmin { ref admin, .. } if admin.role == AdminRole::Superadmin
        ));

        let state = service.resolve_token(&plain_token).await.unwrap();
        assert_eq!(
            state,
            SessionState::AuthenticatedNonAdmin { user: plain_user }
        );

        let state = service.resolve_token("expired").await.unwrap();
        assert_eq!(state, SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_admin_lookup_failure_resolves_to_non_admin() {
        let store = Arc::new(MemoryStore::dashboard());
        store.fail_table(crate::shared::constants::TABLE_ADMINS, "relation does not exist");
        let provider = Arc::new(FakeAuthProvider::new());
        let user = provider.add_user("admin@nobti.app", "secret");
        let service = service(store, provider);

        let state = service.resolve_user(user.clone()).await;

        assert_eq!(state, SessionState::AuthenticatedNonAdmin { user });
    }

    #[tokio::test]
    async fn test_login_rejected_credentials() {
        let store = Arc::new(MemoryStore::dashboard());
        let provider = Arc::new(FakeAuthProvider::new());
        provider.add_user("admin@nobti.app", "secret");
        let service = service(store, provider);

        let err = service
            .login(LoginRequestDto {
                email: "admin@nobti.app".to_string(),
                password: "wrong".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Auth(ref m) if m == "Invalid login credentials"));
    }

    #[tokio::test]
    async fn test_login_returns_session_state() {
        let store = Arc::new(MemoryStore::dashboard());
        let provider = Arc::new(FakeAuthProvider::new());
        let user = provider.add_user("admin@nobti.app", "secret");
        seed_admin_for(&store, user.id, AdminRole::Admin);
        let service = service(store, Arc::clone(&provider));

        let response = service
            .login(LoginRequestDto {
                email: "admin@nobti.app".to_string(),
                password: "secret".to_string(),
            })
            .await
            .unwrap();

        assert!(response.session.is_admin());
        assert_eq!(
            service.resolve_token(&response.access_token).await.unwrap(),
            response.session
        );

        service.logout(&response.access_token).await.unwrap();
        assert_eq!(
            service.resolve_token(&response.access_token).await.unwrap(),
            SessionState::Unauthenticated
        );
    }
}
