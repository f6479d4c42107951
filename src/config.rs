use crate::utils::AppError;
use std::env;
use std::str::FromStr;

/// JWT and session cookie settings shared by the auth handlers and the guard
/// middleware.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub issuer: String,
    pub audience: String,
    pub token_ttl_hours: i64,
    pub cookie_secure: bool,
    pub bcrypt_cost: u32,
}

#[derive(Debug, Clone)]
pub struct EmailSettings {
    /// None means messages are only logged.
    pub api_key: Option<String>,
    pub api_url: String,
    pub from: String,
    pub contact_to: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongodb_uri: String,
    pub mongodb_db: String,
    pub frontend_url: String,
    pub model_service_url: Option<String>,
    pub auth: AuthSettings,
    pub email: EmailSettings,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Empty values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            get(key).ok_or_else(|| AppError::Config(format!("{} must be set", key)))
        };

        let production = get("APP_ENV").map(|v| v == "production").unwrap_or(false);

        let auth = AuthSettings {
            jwt_secret: required("JWT_SECRET")?,
            issuer: get("JWT_ISSUER").unwrap_or_else(|| "oceanova".to_string()),
            audience: get("JWT_AUDIENCE").unwrap_or_else(|| "oceanova-dashboard".to_string()),
            token_ttl_hours: parse_or(get("JWT_TTL_HOURS"), "JWT_TTL_HOURS", 168)?,
            cookie_secure: parse_or(get("COOKIE_SECURE"), "COOKIE_SECURE", production)?,
            bcrypt_cost: parse_or(get("BCRYPT_COST"), "BCRYPT_COST", bcrypt::DEFAULT_COST)?,
        };

        if auth.token_ttl_hours <= 0 {
            return Err(AppError::Config("JWT_TTL_HOURS must be positive".to_string()));
        }

        let email = EmailSettings {
            api_key: get("EMAIL_API_KEY"),
            api_url: get("EMAIL_API_URL")
                .unwrap_or_else(|| "https://api.resend.com/emails".to_string()),
            from: get("EMAIL_FROM")
                .unwrap_or_else(|| "Oceanova <onboarding@resend.dev>".to_string()),
            contact_to: get("CONTACT_TO_EMAIL")
                .unwrap_or_else(|| "contact@oceanova.org".to_string()),
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(get("PORT"), "PORT", 3001)?,
            mongodb_uri: required("MONGODB_URI")?,
            mongodb_db: get("MONGODB_DB").unwrap_or_else(|| "oceanova".to_string()),
            frontend_url: get("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
            model_service_url: get("MODEL_SERVICE_URL")
                .map(|url| url.trim_end_matches('/').to_string()),
            auth,
            email,
        })
    }
}

fn parse_or<T: FromStr>(value: Option<String>, key: &str, default: T) -> Result<T, AppError> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} has an invalid value: {}", key, raw))),
        None => Ok(default),
    }
}
