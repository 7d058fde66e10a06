use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::admins::models::Admin;
use crate::features::auth::provider::AuthUser;

/// Resolved access level of the current identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionState {
    Unauthenticated,
    /// Signed in, but no admin grant exists for the user
    AuthenticatedNonAdmin { user: AuthUser },
    AuthenticatedAdmin { user: AuthUser, admin: Admin },
}

impl SessionState {
    pub fn user(&self) -> Option<&AuthUser> {
        match self {
            SessionState::Unauthenticated => None,
            SessionState::AuthenticatedNonAdmin { user }
            | SessionState::AuthenticatedAdmin { user, .. } => Some(user),
        }
    }

    pub fn admin(&self) -> Option<&Admin> {
        match self {
            SessionState::AuthenticatedAdmin { admin, .. } => Some(admin),
            _ => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.admin().is_some()
    }
}

/// What observers of a `SessionContext` see
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub state: SessionState,
    /// Cleared once the admin lookup for the latest transition has settled
    pub loading: bool,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            state: SessionState::Unauthenticated,
            loading: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_state_serializes_with_status_tag() {
        let user = AuthUser {
            id: Uuid::nil(),
            email: Some("ops@nobti.app".to_string()),
        };
        let json = serde_json::to_value(SessionState::AuthenticatedNonAdmin { user }).unwrap();

        assert_eq!(json["status"], "authenticated_non_admin");
        assert_eq!(json["user"]["email"], "ops@nobti.app");
        assert_eq!(
            serde_json::to_value(SessionState::Unauthenticated).unwrap(),
            serde_json::json!({ "status": "unauthenticated" })
        );
    }
}
