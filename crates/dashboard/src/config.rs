//! Dashboard configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DASHBOARD_BASE_URL` - Public URL of the dashboard (https enables secure cookies)
//! - `DASHBOARD_SELLER_EMAIL` - Sign-in email of the seller account
//! - `DASHBOARD_SELLER_PASSWORD_HASH` - Argon2 PHC hash of the seller password
//!   (generate with `sellah-cli hash-password`)
//!
//! ## Optional
//! - `DASHBOARD_HOST` - Bind address (default: 127.0.0.1)
//! - `DASHBOARD_PORT` - Listen port (default: 3000)
//! - `DASHBOARD_STATIC_DIR` - Static asset directory (default: crates/dashboard/static)
//! - `DASHBOARD_LOG_FORMAT` - `text` or `json` (default: text)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 0.1)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use argon2::PasswordHash;
use secrecy::{ExposeSecret, SecretString};
use sellah_core::Email;
use thiserror::Error;

const DEFAULT_STATIC_DIR: &str = "crates/dashboard/static";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected `text` or `json`, got `{other}`")),
        }
    }
}

/// Dashboard application configuration.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the dashboard
    pub base_url: String,
    /// The seller account allowed to sign in
    pub seller: SellerAccountConfig,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Seller sign-in credentials.
///
/// Implements `Debug` manually to redact the password hash.
#[derive(Clone)]
pub struct SellerAccountConfig {
    /// Canonical sign-in email
    pub email: Email,
    /// Argon2 PHC string
    pub password_hash: SecretString,
}

impl std::fmt::Debug for SellerAccountConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SellerAccountConfig")
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

impl SellerAccountConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let email = Email::parse(&get_required_env("DASHBOARD_SELLER_EMAIL")?).map_err(|e| {
            ConfigError::InvalidEnvVar("DASHBOARD_SELLER_EMAIL".to_string(), e.to_string())
        })?;
        let password_hash = SecretString::from(get_required_env("DASHBOARD_SELLER_PASSWORD_HASH")?);
        validate_password_hash(&password_hash, "DASHBOARD_SELLER_PASSWORD_HASH")?;

        Ok(Self {
            email,
            password_hash,
        })
    }
}

impl DashboardConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("DASHBOARD_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("DASHBOARD_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("DASHBOARD_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("DASHBOARD_PORT".to_string(), e.to_string()))?;
        let base_url = get_required_env("DASHBOARD_BASE_URL")?;
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::InvalidEnvVar(
                "DASHBOARD_BASE_URL".to_string(),
                "must start with http:// or https://".to_string(),
            ));
        }
        let seller = SellerAccountConfig::from_env()?;
        let static_dir = PathBuf::from(get_env_or_default(
            "DASHBOARD_STATIC_DIR",
            DEFAULT_STATIC_DIR,
        ));
        let log_format = get_env_or_default("DASHBOARD_LOG_FORMAT", "text")
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::InvalidEnvVar("DASHBOARD_LOG_FORMAT".to_string(), e))?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.1);

        Ok(Self {
            host,
            port,
            base_url,
            seller,
            static_dir,
            log_format,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Validate that a configured password hash is a PHC string.
fn validate_password_hash(hash: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    PasswordHash::new(hash.expose_secret()).map_err(|e| {
        ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("not a valid password hash ({e}); run `sellah-cli hash-password`"),
        )
    })?;
    Ok(())
}

/// Configuration for unit tests: a seller `seller@example.com` with the
/// password `correct horse battery staple`.
#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) fn test_config(base_url: &str) -> DashboardConfig {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(b"correct horse battery staple", &salt)
        .unwrap()
        .to_string();

    DashboardConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 3000,
        base_url: base_url.to_string(),
        seller: SellerAccountConfig {
            email: Email::parse("seller@example.com").unwrap(),
            password_hash: SecretString::from(hash),
        },
        static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        log_format: LogFormat::Text,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.1,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let addr = test_config("http://localhost:3000").socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_is_secure() {
        assert!(test_config("https://dashboard.sellah.shop").is_secure());
        assert!(!test_config("http://localhost:3000").is_secure());
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(" TEXT ".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("yaml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_validate_password_hash() {
        let config = test_config("http://localhost");
        assert!(validate_password_hash(&config.seller.password_hash, "TEST").is_ok());

        let err =
            validate_password_hash(&SecretString::from("hunter2".to_string()), "TEST").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_seller_config_debug_redacts_hash() {
        let debug_output = format!("{:?}", test_config("http://localhost:3000").seller);

        assert!(debug_output.contains("seller@example.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("argon2id"));
    }
}
