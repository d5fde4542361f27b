use std::env;

use crate::models::Theme;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub api_base_url: String,
    pub auth_base_url: String,
    pub public_url: String,
    pub session_ttl_minutes: i64,
    pub session_check_secs: u64,
    pub default_theme: Theme,
    pub default_phone_number: String,
    pub default_country: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let api_base_url =
            env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".to_string());

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "receptionist.db".to_string()),
            auth_base_url: env::var("AUTH_BASE_URL").unwrap_or_else(|_| api_base_url.clone()),
            api_base_url,
            public_url: env::var("PUBLIC_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            session_ttl_minutes: env::var("SESSION_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|m: &i64| *m > 0)
                .unwrap_or(30),
            session_check_secs: env::var("SESSION_CHECK_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|s: &u64| *s > 0)
                .unwrap_or(60),
            default_theme: env::var("DEFAULT_THEME")
                .ok()
                .and_then(|v| Theme::parse(&v))
                .unwrap_or(Theme::Dark),
            default_phone_number: env::var("DEFAULT_PHONE_NUMBER")
                .unwrap_or_else(|_| "1234567890".to_string()),
            default_country: env::var("DEFAULT_COUNTRY").unwrap_or_else(|_| "US".to_string()),
        }
    }
}
