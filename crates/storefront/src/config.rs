//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `FLATSTORE_HOST` - Bind address (default: 127.0.0.1)
//! - `FLATSTORE_PORT` - Listen port (default: 3000)
//! - `FLATSTORE_DATA_DIR` - Directory holding the collection files (default: data)
//! - `FLATSTORE_STATIC_DIR` - Frontend directory served at `/` (default: none)
//! - `FLATSTORE_SEED` - Write default data into never-written collections (default: true)
//! - `FLATSTORE_REQUIRE_ADMIN` - Require an admin session on admin routes (default: false)
//! - `FLATSTORE_SECURE_COOKIES` - Set the `Secure` flag on the session cookie (default: false)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory of `<collection>.json` files
    pub data_dir: PathBuf,
    /// Frontend files served for non-API paths
    pub static_dir: Option<PathBuf>,
    /// Seed default data at startup
    pub seed: bool,
    /// Enforce admin identity on admin routes
    pub require_admin: bool,
    /// Mark the session cookie `Secure`
    pub secure_cookies: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<SecretString>,
    /// Sentry environment (e.g. production)
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            data_dir: PathBuf::from("data"),
            static_dir: None,
            seed: true,
            require_admin: false,
            secure_cookies: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a variable is set but cannot
    /// be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a variable cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let env = Env { lookup: &lookup };

        Ok(Self {
            host: env.parsed("FLATSTORE_HOST")?.unwrap_or(defaults.host),
            port: env.parsed("FLATSTORE_PORT")?.unwrap_or(defaults.port),
            data_dir: env
                .get("FLATSTORE_DATA_DIR")
                .map_or(defaults.data_dir, PathBuf::from),
            static_dir: env.get("FLATSTORE_STATIC_DIR").map(PathBuf::from),
            seed: env.flag("FLATSTORE_SEED")?.unwrap_or(defaults.seed),
            require_admin: env
                .flag("FLATSTORE_REQUIRE_ADMIN")?
                .unwrap_or(defaults.require_admin),
            secure_cookies: env
                .flag("FLATSTORE_SECURE_COOKIES")?
                .unwrap_or(defaults.secure_cookies),
            sentry_dsn: env.get("SENTRY_DSN").map(SecretString::from),
            sentry_environment: env.get("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env
                .parsed("SENTRY_SAMPLE_RATE")?
                .unwrap_or(defaults.sentry_sample_rate),
            sentry_traces_sample_rate: env
                .parsed("SENTRY_TRACES_SAMPLE_RATE")?
                .unwrap_or(defaults.sentry_traces_sample_rate),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a, F: Fn(&str) -> Option<String>> {
    lookup: &'a F,
}

impl<F: Fn(&str) -> Option<String>> Env<'_, F> {
    /// Get a variable; empty values count as unset.
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|value| !value.trim().is_empty())
    }

    fn parsed<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(key)
            .map(|value| {
                value
                    .trim()
                    .parse::<T>()
                    .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
            })
            .transpose()
    }

    fn flag(&self, key: &str) -> Result<Option<bool>, ConfigError> {
        self.get(key)
            .map(|value| match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                other => Err(ConfigError::InvalidEnvVar(
                    key.to_string(),
                    format!("expected a boolean, got {other:?}"),
                )),
            })
            .transpose()
    }
}

/// Get a required environment variable.
///
/// # Errors
///
/// Returns `ConfigError::MissingEnvVar` if the variable is unset.
pub fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert!(config.seed);
        assert!(!config.require_admin);
        assert!(config.static_dir.is_none());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("FLATSTORE_HOST", "0.0.0.0"),
            ("FLATSTORE_PORT", "8080"),
            ("FLATSTORE_DATA_DIR", "/var/lib/flatstore"),
            ("FLATSTORE_STATIC_DIR", "frontend"),
            ("FLATSTORE_SEED", "false"),
            ("FLATSTORE_REQUIRE_ADMIN", "YES"),
            ("SENTRY_DSN", "https://key@sentry.example/1"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/flatstore"));
        assert_eq!(config.static_dir, Some(PathBuf::from("frontend")));
        assert!(!config.seed);
        assert!(config.require_admin);
        assert_eq!(
            config.sentry_dsn.unwrap().expose_secret(),
            "https://key@sentry.example/1"
        );
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("FLATSTORE_PORT", "70000")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "FLATSTORE_PORT"));
    }

    #[test]
    fn test_invalid_flag() {
        let err = load(&[("FLATSTORE_SEED", "maybe")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "FLATSTORE_SEED"));
    }

    #[test]
    fn test_empty_value_counts_as_unset() {
        let config = load(&[("FLATSTORE_PORT", ""), ("SENTRY_DSN", " ")]).unwrap();
        assert_eq!(config.port, 3000);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_debug_redacts_dsn() {
        let config = load(&[("SENTRY_DSN", "https://supersecretkey@sentry.example/1")]).unwrap();
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("supersecretkey"));
    }
}
