use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Administrative role. Both roles grant the same access.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AdminRole {
    #[default]
    Admin,
    Superadmin,
}

impl AdminRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminRole::Admin => "admin",
            AdminRole::Superadmin => "superadmin",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            AdminRole::Admin => "Admin",
            AdminRole::Superadmin => "Super Admin",
        }
    }
}

impl fmt::Display for AdminRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdminRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(AdminRole::Admin),
            "superadmin" => Ok(AdminRole::Superadmin),
            other => Err(format!(
                "Invalid role '{}' (expected admin or superadmin)",
                other
            )),
        }
    }
}

/// Grant of administrative access to one authenticated user (`admins` table)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Admin {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role: AdminRole,
    pub created_at: DateTime<Utc>,
}
