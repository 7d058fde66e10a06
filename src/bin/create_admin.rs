//! Grant the admin role to an account, creating the auth user if needed.
//!
//! ```text
//! create-admin <email> <password> [admin|superadmin]
//! ```
//!
//! Needs `SUPABASE_URL` and `SUPABASE_SERVICE_ROLE_KEY`, read from the
//! environment, `.env` or `.env.local`.

use std::process::ExitCode;
use std::sync::Arc;

use nobti_admin::core::config::SupabaseConfig;
use nobti_admin::features::admins::models::AdminRole;
use nobti_admin::features::admins::provisioning::provision_admin;
use nobti_admin::features::admins::AdminService;
use nobti_admin::features::auth::clients::SupabaseAuthClient;
use nobti_admin::modules::store::PostgrestClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "Usage: create-admin <email> <password> [role]";

#[tokio::main]
async fn main() -> ExitCode {
    // Existing variables win, so the more specific file goes first
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let (Some(url), Some(service_role_key)) = (
        SupabaseConfig::url_from_env(),
        SupabaseConfig::service_role_key_from_env(),
    ) else {
        eprintln!("Error: Missing SUPABASE_URL or SUPABASE_SERVICE_ROLE_KEY");
        return ExitCode::FAILURE;
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (email, password) = match (args.first(), args.get(1)) {
        (Some(email), Some(password)) => (email.as_str(), password.as_str()),
        _ => {
            eprintln!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };
    let role = match args.get(2).map(|r| r.parse::<AdminRole>()).transpose() {
        Ok(role) => role.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Service-role credentials for both endpoints; the anon key is never used here
    let config = SupabaseConfig {
        url,
        anon_key: service_role_key.clone(),
        service_role_key,
    };
    let directory = SupabaseAuthClient::new(&config);
    let admins = AdminService::new(Arc::new(PostgrestClient::new(&config)));

    match provision_admin(&directory, &admins, email, password, role).await {
        Ok(provisioned) => {
            println!(
                "Success! User {} ({}) is now a {}.",
                email,
                provisioned.user.id,
                provisioned.role.label()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
