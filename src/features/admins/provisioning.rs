//! Bootstrap of admin accounts from the command line.
//!
//! Used by the `create-admin` binary with service-role credentials: find
//! or create the auth user, then grant the admin row.

use crate::core::error::Result;
use crate::features::admins::models::AdminRole;
use crate::features::admins::AdminService;
use crate::features::auth::provider::{AuthUser, UserDirectory};

#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionedAdmin {
    pub user: AuthUser,
    /// Whether the auth user was created by this run
    pub created_user: bool,
    pub role: AdminRole,
}

/// Ensure `email` exists as an auth user (email confirmed) and holds `role`.
///
/// Running it again for the same email changes the role in place.
pub async fn provision_admin(
    directory: &dyn UserDirectory,
    admins: &AdminService,
    email: &str,
    password: &str,
    role: AdminRole,
) -> Result<ProvisionedAdmin> {
    tracing::info!("Looking up user {}", email);

    let (user, created_user) = match directory.find_user_by_email(email).await? {
        Some(user) => {
            tracing::info!("User already exists: {}", user.id);
            (user, false)
        }
        None => {
            tracing::info!("Creating user {}", email);
            let user = directory.create_user(email, password).await?;
            tracing::info!("User created: {}", user.id);
            (user, true)
        }
    };

    admins.upsert(user.id, role).await?;
    tracing::info!("Granted {} role to {}", role, email);

    Ok(ProvisionedAdmin {
        user,
        created_user,
        role,
    })
}
