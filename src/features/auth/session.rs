//! Long-lived session tracking for one signed-in operator.
//!
//! A [`SessionContext`] is created explicitly by whoever drives a session
//! (a dashboard client, a CLI, a test) and passed by reference to the code
//! that needs it. `initialize` subscribes to provider notifications and
//! `close` drops the subscription; in between, every transition re-resolves
//! the admin grant before `loading` is cleared.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};

use crate::core::error::Result;
use crate::features::admins::AdminService;
use crate::features::auth::model::{SessionSnapshot, SessionState};
use crate::features::auth::provider::{AuthEvent, AuthProvider, AuthSession, AuthUser};
use crate::features::auth::services::AuthService;

pub struct SessionContext {
    auth: AuthService,
    provider: Arc<dyn AuthProvider>,
    session: Option<AuthSession>,
    events: Option<broadcast::Receiver<AuthEvent>>,
    snapshot: watch::Sender<SessionSnapshot>,
}

impl SessionContext {
    pub fn new(provider: Arc<dyn AuthProvider>, admins: Arc<AdminService>) -> Self {
        let (snapshot, _) = watch::channel(SessionSnapshot::default());
        Self {
            auth: AuthService::new(Arc::clone(&provider), admins),
            provider,
            session: None,
            events: None,
            snapshot,
        }
    }

    /// Subscribe to provider notifications and settle the initial state from
    /// a previously stored session, if any
    pub async fn initialize(&mut self, stored: Option<AuthSession>) {
        self.events = Some(self.provider.subscribe());
        self.begin_transition();
        let state = self.verify(stored).await;
        self.settle(state);
    }

    /// Sign in with a credential pair.
    ///
    /// On rejection the provider's message is returned and the context
    /// stays unauthenticated.
    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<()> {
        self.begin_transition();

        match self.provider.sign_in_with_password(email, password).await {
            Ok(session) => {
                let state = self.auth.resolve_user(session.user.clone()).await;
                self.session = Some(session);
                self.settle(state);
                Ok(())
            }
            Err(e) => {
                tracing::info!("Sign-in rejected for {}: {}", email, e);
                self.session = None;
                self.settle(SessionState::Unauthenticated);
                Err(e.into())
            }
        }
    }

    /// Sign out; local state is cleared even if the provider call fails
    pub async fn sign_out(&mut self) -> Result<()> {
        let Some(session) = self.session.take() else {
            self.settle(SessionState::Unauthenticated);
            return Ok(());
        };

        self.begin_transition();
        let result = self.provider.sign_out(&session.access_token).await;
        self.settle(SessionState::Unauthenticated);

        result.map_err(Into::into)
    }

    /// Exchange the refresh token for a new session
    pub async fn refresh(&mut self) -> Result<()> {
        let Some(refresh_token) = self.session.as_ref().map(|s| s.refresh_token.clone()) else {
            return Ok(());
        };

        let session = self.provider.refresh_session(&refresh_token).await?;
        self.adopt(session).await;
        Ok(())
    }

    /// Apply pending provider notifications that concern this session.
    ///
    /// Returns the number of notifications applied. Sign-ins are applied by
    /// [`SessionContext::sign_in`] itself and are skipped here.
    pub async fn process_events(&mut self) -> usize {
        let mut pending = Vec::new();
        let mut lagged = false;

        if let Some(events) = self.events.as_mut() {
            loop {
                match events.try_recv() {
                    Ok(event) => pending.push(event),
                    Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                        tracing::warn!("Missed {} session notifications", skipped);
                        lagged = true;
                    }
                    Err(_) => break,
                }
            }
        }

        let mut applied = 0;
        for event in pending {
            if self.apply(event).await {
                applied += 1;
            }
        }

        if lagged && applied == 0 {
            self.reverify().await;
        }

        applied
    }

    /// Drop the provider subscription; the last state stays readable
    pub fn close(&mut self) {
        if self.events.take().is_some() {
            tracing::debug!("Session context closed");
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn state(&self) -> SessionState {
        self.snapshot.borrow().state.clone()
    }

    pub fn session(&self) -> Option<&AuthSession> {
        self.session.as_ref()
    }

    async fn apply(&mut self, event: AuthEvent) -> bool {
        let Some(current) = self.session.as_ref() else {
            return false;
        };

        match event {
            AuthEvent::SignedIn(_) => false,
            AuthEvent::SignedOut { access_token } => {
                if access_token != current.access_token {
                    return false;
                }
                tracing::info!("Session for user {} ended", current.user.id);
                self.session = None;
                self.settle(SessionState::Unauthenticated);
                true
            }
            AuthEvent::TokenRefreshed(session) => {
                if session.user.id != current.user.id {
                    return false;
                }
                self.adopt(session).await;
                true
            }
            AuthEvent::UserUpdated(user) => {
                if user.id != current.user.id {
                    return false;
                }
                self.update_user(user).await;
                true
            }
        }
    }

    async fn adopt(&mut self, session: AuthSession) {
        self.begin_transition();
        let state = self.auth.resolve_user(session.user.clone()).await;
        self.session = Some(session);
        self.settle(state);
    }

    async fn update_user(&mut self, user: AuthUser) {
        self.begin_transition();
        if let Some(session) = self.session.as_mut() {
            session.user = user.clone();
        }
        let state = self.auth.resolve_user(user).await;
        self.settle(state);
    }

    async fn reverify(&mut self) {
        let stored = self.session.take();
        self.begin_transition();
        let state = self.verify(stored).await;
        self.settle(state);
    }

    /// Check a stored session against the provider and resolve its user
    async fn verify(&mut self, stored: Option<AuthSession>) -> SessionState {
        let Some(session) = stored else {
            return SessionState::Unauthenticated;
        };

        match self.provider.get_user(&session.access_token).await {
            Ok(Some(user)) => {
                let state = self.auth.resolve_user(user).await;
                self.session = Some(session);
                state
            }
            Ok(None) => {
                tracing::debug!("Stored session is no longer valid");
                SessionState::Unauthenticated
            }
            Err(e) => {
                tracing::warn!("Could not verify stored session: {}", e);
                SessionState::Unauthenticated
            }
        }
    }

    fn begin_transition(&self) {
        self.snapshot.send_modify(|s| s.loading = true);
    }

    fn settle(&self, state: SessionState) {
        self.snapshot.send_replace(SessionSnapshot {
            state,
            loading: false,
        });
    }
}
