use std::{env, time::Duration};
use secrecy::SecretString;

const DEFAULT_JWT_SECRET: &str = "dev_secret_key_change_in_production";
const DEFAULT_ANON_KEY: &str = "supabase_anon_key";

#[derive(Clone, Debug)]
pub struct Config {
    pub supabase_url: String,
    pub supabase_anon_key: SecretString,
    pub supabase_jwt_secret: SecretString,
    pub app_origin: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub remote_timeout_secs: u64,
    pub default_time_limit: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| "http://localhost:54321".to_string()),
            supabase_anon_key: SecretString::from(
                env::var("SUPABASE_ANON_KEY").unwrap_or_else(|_| DEFAULT_ANON_KEY.to_string()),
            ),
            supabase_jwt_secret: SecretString::from(
                env::var("SUPABASE_JWT_SECRET").unwrap_or_else(|_| DEFAULT_JWT_SECRET.to_string()),
            ),
            app_origin: env::var("APP_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            remote_timeout_secs: env::var("REMOTE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|s| *s > 0)
                .unwrap_or(8),
            default_time_limit: env::var("DEFAULT_TIME_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|s| *s > 0)
                .unwrap_or(600),
        }
    }

    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.remote_timeout_secs)
    }

    /// Validate that production-critical configuration is set
    /// Panics if required secrets are using default values
    pub fn validate_for_production(&self) {
        use secrecy::ExposeSecret;

        let jwt_secret = self.supabase_jwt_secret.expose_secret();

        if jwt_secret == DEFAULT_JWT_SECRET {
            panic!(
                "FATAL: SUPABASE_JWT_SECRET is using default value! Set it to the project's JWT secret."
            );
        }

        if jwt_secret.len() < 32 {
            panic!(
                "FATAL: SUPABASE_JWT_SECRET is too short ({}). Must be at least 32 characters.",
                jwt_secret.len()
            );
        }

        if self.supabase_anon_key.expose_secret() == DEFAULT_ANON_KEY {
            panic!("FATAL: SUPABASE_ANON_KEY is using default value! Set SUPABASE_ANON_KEY.");
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: SecretString::from("test_anon_key".to_string()),
            supabase_jwt_secret: SecretString::from("test_jwt_secret_key".to_string()),
            app_origin: "https://app.example.com".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            remote_timeout_secs: 1,
            default_time_limit: 600,
        }
    }
}
