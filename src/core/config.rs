use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub supabase: SupabaseConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

/// Connection settings for the managed backend (REST data store + auth service)
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`
    pub url: String,
    /// Public key sent as `apikey` on end-user auth calls
    pub anon_key: String,
    /// Service role key used for data access and admin auth operations
    pub service_role_key: String,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            supabase: SupabaseConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl SupabaseConfig {
    pub fn from_env() -> Result<Self, String> {
        let url = Self::url_from_env()
            .ok_or_else(|| "SUPABASE_URL environment variable is required".to_string())?;

        let service_role_key = Self::service_role_key_from_env().ok_or_else(|| {
            "SUPABASE_SERVICE_ROLE_KEY environment variable is required".to_string()
        })?;

        // Fall back to the service key when no public key is configured
        let anon_key = env::var("SUPABASE_ANON_KEY")
            .or_else(|_| env::var("VITE_SUPABASE_ANON_KEY"))
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| service_role_key.clone());

        Ok(Self {
            url,
            anon_key,
            service_role_key,
        })
    }

    /// Accepts the dashboard's legacy `VITE_` variable names as fallbacks.
    pub fn url_from_env() -> Option<String> {
        ["SUPABASE_URL", "VITE_SUPABASE_URL", "VITE_PUBLIC_SUPABASE_URL"]
            .iter()
            .find_map(|key| env::var(key).ok().filter(|s| !s.is_empty()))
            .map(|url| url.trim_end_matches('/').to_string())
    }

    pub fn service_role_key_from_env() -> Option<String> {
        env::var("SUPABASE_SERVICE_ROLE_KEY")
            .ok()
            .filter(|s| !s.is_empty())
    }

    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.url)
    }

    pub fn auth_url(&self) -> String {
        format!("{}/auth/v1", self.url)
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Nobti Admin API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Administration API for the Nobti wait-time service".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supabase_urls() {
        let config = SupabaseConfig {
            url: "https://demo.supabase.co".to_string(),
            anon_key: "anon".to_string(),
            service_role_key: "service".to_string(),
        };

        assert_eq!(config.rest_url(), "https://demo.supabase.co/rest/v1");
        assert_eq!(config.auth_url(), "https://demo.supabase.co/auth/v1");
    }

    #[test]
    fn test_swagger_credentials() {
        let mut config = SwaggerConfig {
            username: Some("ops".to_string()),
            password: None,
            title: String::new(),
            version: String::new(),
            description: String::new(),
        };
        assert_eq!(config.credentials(), None);

        config.password = Some("secret".to_string());
        assert_eq!(config.credentials().as_deref(), Some("ops:secret"));
    }
}
