//! Service Configuration Settings
//!
//! Loaded from environment variables. Unparseable values fall back to their
//! defaults; values that must not be empty are rejected.

use std::path::PathBuf;

use crate::application::use_cases::VotingPolicy;
use crate::infrastructure::notification::{DEFAULT_CAPACITY, MAX_CAPACITY};

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Local development.
    #[default]
    Development,
    /// Production deployment.
    Production,
}

impl Environment {
    /// Parse environment from string.
    #[must_use]
    pub fn from_str_case_insensitive(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    /// Get the environment name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

/// Default database location.
pub const DEFAULT_DB_PATH: &str = "./data/social.db";

/// Default health server port.
pub const DEFAULT_HEALTH_PORT: u16 = 8083;

/// Complete service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// Deployment environment.
    pub environment: Environment,
    /// Turso database file for subscriptions.
    pub db_path: PathBuf,
    /// Health and metrics HTTP port.
    pub health_port: u16,
    /// Broadcast channel capacity for outgoing notifications.
    pub notification_capacity: usize,
    /// Vote notification behaviour.
    pub voting: VotingPolicy,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            health_port: DEFAULT_HEALTH_PORT,
            notification_capacity: DEFAULT_CAPACITY,
            voting: VotingPolicy::default(),
        }
    }
}

impl CoreConfig {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::EmptyValue`] if `SOCIAL_DB_PATH` is set but empty.
    /// - [`ConfigError::OutOfRange`] if `SOCIAL_NOTIFICATION_CAPACITY` is
    ///   zero or above [`MAX_CAPACITY`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// See [`CoreConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let environment = lookup("SOCIAL_ENV")
            .map(|s| Environment::from_str_case_insensitive(&s))
            .unwrap_or_default();

        let db_path = match lookup("SOCIAL_DB_PATH") {
            Some(path) if path.trim().is_empty() => {
                return Err(ConfigError::EmptyValue("SOCIAL_DB_PATH".to_string()));
            }
            Some(path) => PathBuf::from(path),
            None => defaults.db_path,
        };

        let health_port = parse_or(&lookup, "SOCIAL_HEALTH_PORT", defaults.health_port);
        let notification_capacity = parse_or(
            &lookup,
            "SOCIAL_NOTIFICATION_CAPACITY",
            defaults.notification_capacity,
        );
        if !(1..=MAX_CAPACITY).contains(&notification_capacity) {
            return Err(ConfigError::OutOfRange {
                key: "SOCIAL_NOTIFICATION_CAPACITY".to_string(),
                value: notification_capacity.to_string(),
                max: MAX_CAPACITY,
            });
        }
        let notify_on_retract = lookup("SOCIAL_NOTIFY_ON_RETRACT")
            .and_then(|v| parse_bool(&v))
            .unwrap_or(defaults.voting.notify_on_retract);

        Ok(Self {
            environment,
            db_path,
            health_port,
            notification_capacity,
            voting: VotingPolicy { notify_on_retract },
        })
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Environment variable has empty value.
    #[error("environment variable {0} cannot be empty")]
    EmptyValue(String),

    /// Numeric value outside its accepted range.
    #[error("environment variable {key}={value} must be between 1 and {max}")]
    OutOfRange {
        /// Variable name.
        key: String,
        /// Value as given.
        value: String,
        /// Largest accepted value.
        max: usize,
    },
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
