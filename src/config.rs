use std::env;
use std::path::PathBuf;

use thiserror::Error;

/// Minimum accepted password length for the credentials sign-in path.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Upper bound for `SESSION_TTL_HOURS` (one year).
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Test,
}

impl Environment {
    fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            other => Err(ConfigError::Invalid {
                key: "APP_ENV",
                reason: format!("unknown environment '{other}'"),
            }),
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Everything the identity service needs, built once at startup and injected.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Lower-cased admin email addresses.
    pub admin_emails: Vec<String>,
    /// Lower-cased domains whose addresses are all admitted.
    pub allowed_domains: Vec<String>,
    pub session_secret: String,
    pub session_ttl_hours: i64,
    pub google_client_id: Option<String>,
    pub min_password_len: usize,
    /// Mark the session cookie `Secure` (everywhere except development).
    pub secure_cookies: bool,
}

impl AuthConfig {
    pub fn new(admin_emails: &[&str], allowed_domains: &[&str], session_secret: &str) -> Self {
        Self {
            admin_emails: admin_emails.iter().map(|e| e.trim().to_lowercase()).collect(),
            allowed_domains: allowed_domains
                .iter()
                .map(|d| d.trim().to_lowercase())
                .collect(),
            session_secret: session_secret.to_string(),
            session_ttl_hours: 24 * 30,
            google_client_id: None,
            min_password_len: MIN_PASSWORD_LEN,
            secure_cookies: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub redis_url: Option<String>,
    pub port: u16,
    pub environment: Environment,
    pub static_dir: Option<PathBuf>,
    pub admin_dir: Option<PathBuf>,
    pub cors_origin: Option<String>,
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Read configuration from the process environment (after `.env` is loaded).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let database_url = required("DATABASE_URL")?;

        let port = match optional("PORT") {
            Some(raw) => raw.parse().map_err(|e| ConfigError::Invalid {
                key: "PORT",
                reason: format!("{e}"),
            })?,
            None => 8080,
        };

        let environment = match optional("APP_ENV") {
            Some(raw) => Environment::parse(&raw)?,
            None => Environment::Production,
        };

        let session_secret = required("SESSION_SECRET")?;
        if session_secret.len() < 32 {
            return Err(ConfigError::Invalid {
                key: "SESSION_SECRET",
                reason: "must be at least 32 bytes".to_string(),
            });
        }

        let session_ttl_hours = match optional("SESSION_TTL_HOURS") {
            Some(raw) => parse_ttl_hours(&raw)?,
            None => 24 * 30,
        };

        let auth = AuthConfig {
            admin_emails: split_list(optional("ADMIN_EMAILS").as_deref()),
            allowed_domains: split_list(optional("ALLOWED_EMAIL_DOMAINS").as_deref()),
            session_secret,
            session_ttl_hours,
            google_client_id: optional("GOOGLE_CLIENT_ID"),
            min_password_len: MIN_PASSWORD_LEN,
            secure_cookies: !environment.is_development(),
        };

        if auth.admin_emails.is_empty() && auth.allowed_domains.is_empty() {
            tracing::warn!("ADMIN_EMAILS and ALLOWED_EMAIL_DOMAINS are empty; nobody can sign in");
        }

        Ok(Self {
            database_url,
            redis_url: optional("REDIS_URL"),
            port,
            environment,
            static_dir: optional("STATIC_DIR").map(PathBuf::from),
            admin_dir: optional("ADMIN_DIR").map(PathBuf::from),
            cors_origin: optional("CORS_ORIGIN"),
            auth,
        })
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    optional(key).ok_or(ConfigError::Missing(key))
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_ttl_hours(raw: &str) -> Result<i64, ConfigError> {
    let hours: i64 = raw.trim().parse().map_err(|e| ConfigError::Invalid {
        key: "SESSION_TTL_HOURS",
        reason: format!("{e}"),
    })?;
    if !(1..=MAX_SESSION_TTL_HOURS).contains(&hours) {
        return Err(ConfigError::Invalid {
            key: "SESSION_TTL_HOURS",
            reason: format!("must be between 1 and {MAX_SESSION_TTL_HOURS}"),
        });
    }
    Ok(hours)
}

/// Split a comma-separated list, trimming and lower-casing entries.
pub fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_list_trims_and_lowercases() {
        let list = split_list(Some(" Owner@Example.com, ,ops@example.com "));
        assert_eq!(list, vec!["owner@example.com", "ops@example.com"]);
        assert!(split_list(None).is_empty());
    }

    #[test]
    fn environment_parsing() {
        assert_eq!(Environment::parse("Development").unwrap(), Environment::Development);
        assert_eq!(Environment::parse("prod").unwrap(), Environment::Production);
        assert!(Environment::parse("staging").is_err());
    }

    #[test]
    fn session_ttl_must_be_positive_and_bounded() {
        assert_eq!(parse_ttl_hours(" 12 ").unwrap(), 12);
        assert_eq!(parse_ttl_hours("8760").unwrap(), MAX_SESSION_TTL_HOURS);
        assert!(parse_ttl_hours("0").is_err());
        assert!(parse_ttl_hours("-5").is_err());
        assert!(parse_ttl_hours("8761").is_err());
        assert!(parse_ttl_hours("9223372036854775807").is_err());
        assert!(parse_ttl_hours("soon").is_err());
    }
}
