//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `TEZWEB_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`; without either the server keeps documents in memory)
//! - `TEZWEB_HOST` - Bind address (default: 127.0.0.1)
//! - `TEZWEB_PORT` - Listen port (default: 3000)
//! - `TEZWEB_ROOT_DOMAIN` - Domain public sites are served under (default: tezweb.com)
//! - `TEZWEB_TRANSACTION_ATTEMPTS` - Commit attempts per store transaction (default: 5)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance trace sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// API server configuration.
///
/// `SecretString` redacts the database URL in `Debug` output.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: Option<SecretString>,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Domain whose subdomains serve published sites
    pub root_domain: String,
    /// Commit attempts per store transaction before giving up
    pub transaction_attempts: u32,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. production, staging)
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            root_domain: "tezweb.com".to_string(),
            transaction_attempts: 5,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a variable is set to an invalid
    /// value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Lookup(lookup);
        let defaults = Self::default();

        let database_url = env
            .optional("TEZWEB_DATABASE_URL")
            .or_else(|| env.optional("DATABASE_URL"))
            .map(SecretString::from);

        let transaction_attempts =
            env.parsed("TEZWEB_TRANSACTION_ATTEMPTS", defaults.transaction_attempts)?;
        if transaction_attempts == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "TEZWEB_TRANSACTION_ATTEMPTS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let root_domain = match env.optional("TEZWEB_ROOT_DOMAIN") {
            Some(raw) => parse_root_domain(&raw)?,
            None => defaults.root_domain,
        };

        Ok(Self {
            database_url,
            host: env.parsed("TEZWEB_HOST", defaults.host)?,
            port: env.parsed("TEZWEB_PORT", defaults.port)?,
            root_domain,
            transaction_attempts,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env.rate("SENTRY_SAMPLE_RATE", defaults.sentry_sample_rate)?,
            sentry_traces_sample_rate: env
                .rate("SENTRY_TRACES_SAMPLE_RATE", defaults.sentry_traces_sample_rate)?,
        })
    }

    /// The database URL, for commands that cannot run without `PostgreSQL`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if no database URL is configured.
    pub fn require_database_url(&self) -> Result<&SecretString, ConfigError> {
        self.database_url
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar("TEZWEB_DATABASE_URL".to_string()))
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

struct Lookup<F>(F);

impl<F: Fn(&str) -> Option<String>> Lookup<F> {
    /// Get an optional variable, treating blank values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable parsed as `T`, or `default` when unset.
    fn parsed<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |raw| {
            raw.trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }

    /// Get a sample rate in `0.0..=1.0`.
    fn rate(&self, key: &str, default: f32) -> Result<f32, ConfigError> {
        let rate = self.parsed(key, default)?;
        if (0.0..=1.0).contains(&rate) {
            Ok(rate)
        } else {
            Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("{rate} is outside 0.0..=1.0"),
            ))
        }
    }
}

/// Validate a bare domain name such as `tezweb.com`.
fn parse_root_domain(raw: &str) -> Result<String, ConfigError> {
    let invalid =
        |reason: String| ConfigError::InvalidEnvVar("TEZWEB_ROOT_DOMAIN".to_string(), reason);

    let trimmed = raw.trim().trim_end_matches('.');
    let url = Url::parse(&format!("https://{trimmed}/")).map_err(|e| invalid(e.to_string()))?;
    let host = url
        .host_str()
        .ok_or_else(|| invalid("must be a host name".to_string()))?;

    if host != trimmed.to_lowercase() {
        return Err(invalid(format!("{raw:?} is not a bare domain")));
    }
    Ok(host.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert!(config.database_url.is_none());
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.root_domain, "tezweb.com");
        assert_eq!(config.transaction_attempts, 5);
        assert!(config.sentry_dsn.is_none());
        assert!(matches!(
            config.require_database_url(),
            Err(ConfigError::MissingEnvVar(_))
        ));
    }

    #[test]
    fn test_database_url_fallback() {
        let config = load(&[("DATABASE_URL", "postgres://fly/db")]).unwrap();
        assert_eq!(
            config.database_url.unwrap().expose_secret(),
            "postgres://fly/db"
        );

        let config = load(&[
            ("DATABASE_URL", "postgres://fly/db"),
            ("TEZWEB_DATABASE_URL", "postgres://local/tezweb"),
        ])
        .unwrap();
        assert_eq!(
            config.database_url.unwrap().expose_secret(),
            "postgres://local/tezweb"
        );
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("TEZWEB_HOST", "0.0.0.0"),
            ("TEZWEB_PORT", "8080"),
            ("TEZWEB_ROOT_DOMAIN", "Sites.Example.COM"),
            ("TEZWEB_TRANSACTION_ATTEMPTS", "9"),
            ("SENTRY_TRACES_SAMPLE_RATE", "0.25"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.root_domain, "sites.example.com");
        assert_eq!(config.transaction_attempts, 9);
        assert!((config.sentry_traces_sample_rate - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_invalid_values() {
        for vars in [
            [("TEZWEB_PORT", "70000")],
            [("TEZWEB_HOST", "localhost")],
            [("TEZWEB_TRANSACTION_ATTEMPTS", "0")],
            [("TEZWEB_ROOT_DOMAIN", "tezweb.com/path")],
            [("SENTRY_SAMPLE_RATE", "1.5")],
        ] {
            let err = load(&vars).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == vars[0].0),
                "{vars:?} gave {err}"
            );
        }
    }

    #[test]
    fn test_debug_redacts_database_url() {
        let config = load(&[("TEZWEB_DATABASE_URL", "postgres://user:hunter2@db/tezweb")]).unwrap();
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("hunter2"));
        assert!(debug_output.contains("tezweb.com"));
    }
}
