//! Session settings and configuration structures.

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Namespace prefix shared by every persisted key.
pub const DEFAULT_STORAGE_PREFIX: &str = "providus_";

/// Idle budget: 60 minutes without activity.
pub const DEFAULT_IDLE_TIMEOUT_MS: u64 = 60 * 60 * 1000;

/// Absolute session budget measured from login.
///
/// Thirty hours, as the console has always shipped it. Override through
/// `session.session_lifetime_ms` when a shorter lifetime is wanted.
pub const DEFAULT_SESSION_LIFETIME_MS: u64 = 30 * 60 * 60 * 1000;

/// Refresh when the token expires within 20 minutes.
pub const DEFAULT_REFRESH_THRESHOLD_MS: u64 = 20 * 60 * 1000;

/// Session-expiry poll cadence.
pub const DEFAULT_SESSION_CHECK_INTERVAL_MS: u64 = 5 * 1000;

/// Refresh-window poll cadence.
pub const DEFAULT_REFRESH_CHECK_INTERVAL_MS: u64 = 30 * 1000;

/// Root configuration structure containing all settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Session lifecycle policy (prefix, timeouts, poll cadences)
    pub session: SessionSettings,

    /// Remote API configuration
    pub api: ApiSettings,

    /// Persistent store location
    pub storage: StorageSettings,

    /// Routes used for redirects
    pub routes: RouteSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Session lifecycle policy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionSettings {
    /// Prefix prepended to every persisted key
    pub storage_prefix: String,

    /// Idle timeout in milliseconds
    pub idle_timeout_ms: u64,

    /// Absolute session lifetime in milliseconds
    pub session_lifetime_ms: u64,

    /// Refresh window before token expiry in milliseconds
    pub refresh_threshold_ms: u64,

    /// Session-expiry poll interval in milliseconds
    pub session_check_interval_ms: u64,

    /// Refresh-window poll interval in milliseconds
    pub refresh_check_interval_ms: u64,
}

/// Remote API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    /// Base URL of the console API
    pub base_url: String,

    /// Path of the token refresh endpoint
    pub refresh_path: String,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,
}

/// Persistent store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// JSON file backing the long-lived store
    pub path: PathBuf,
}

/// Route configuration for guards and logout navigation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RouteSettings {
    /// Unauthenticated entry point, target of logout navigation
    pub entry: String,

    /// Login page, target of protected-route redirects
    pub login: String,

    /// Landing page for authenticated users
    pub home: String,
}

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 3. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed,
    /// or if the session policy is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Config::builder()
            .set_default("environment", environment.clone())?
            .set_default("session.storage_prefix", DEFAULT_STORAGE_PREFIX)?
            .set_default("session.idle_timeout_ms", DEFAULT_IDLE_TIMEOUT_MS)?
            .set_default("session.session_lifetime_ms", DEFAULT_SESSION_LIFETIME_MS)?
            .set_default("session.refresh_threshold_ms", DEFAULT_REFRESH_THRESHOLD_MS)?
            .set_default(
                "session.session_check_interval_ms",
                DEFAULT_SESSION_CHECK_INTERVAL_MS,
            )?
            .set_default(
                "session.refresh_check_interval_ms",
                DEFAULT_REFRESH_CHECK_INTERVAL_MS,
            )?
            .set_default("api.base_url", "https://providusbulk.approot.ng")?
            .set_default("api.refresh_path", "/refresh_token.php")?
            .set_default("api.request_timeout_secs", 30)?
            .set_default("storage.path", "data/session.json")?
            .set_default("routes.entry", "/")?
            .set_default("routes.login", "/login")?
            .set_default("routes.home", "/dashboard")?
            // Load from config files
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // APP__SESSION__IDLE_TIMEOUT_MS=600000 -> session.idle_timeout_ms
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("api.base_url", std::env::var("API_BASE_URL").ok())?
            .set_override_option("storage.path", std::env::var("SESSION_STORE_PATH").ok())?
            .build()?
            .try_deserialize()
            .and_then(|settings: Self| {
                settings.session.validate()?;
                Ok(settings)
            })
    }
}

impl SessionSettings {
    /// Reject policies the monitors cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_prefix.is_empty() {
            return Err(ConfigError::Message(
                "session.storage_prefix must not be empty".into(),
            ));
        }

        let durations = [
            ("idle_timeout_ms", self.idle_timeout_ms),
            ("session_lifetime_ms", self.session_lifetime_ms),
            ("refresh_threshold_ms", self.refresh_threshold_ms),
            ("session_check_interval_ms", self.session_check_interval_ms),
            ("refresh_check_interval_ms", self.refresh_check_interval_ms),
        ];
        for (name, value) in durations {
            if value == 0 {
                return Err(ConfigError::Message(format!(
                    "session.{} must be greater than zero",
                    name
                )));
            }
        }

        Ok(())
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }

    pub fn session_check_interval(&self) -> Duration {
        Duration::from_millis(self.session_check_interval_ms)
    }

    pub fn refresh_check_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_check_interval_ms)
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            storage_prefix: DEFAULT_STORAGE_PREFIX.to_string(),
            idle_timeout_ms: DEFAULT_IDLE_TIMEOUT_MS,
            session_lifetime_ms: DEFAULT_SESSION_LIFETIME_MS,
            refresh_threshold_ms: DEFAULT_REFRESH_THRESHOLD_MS,
            session_check_interval_ms: DEFAULT_SESSION_CHECK_INTERVAL_MS,
            refresh_check_interval_ms: DEFAULT_REFRESH_CHECK_INTERVAL_MS,
        }
    }
}

impl ApiSettings {
    /// Full URL of the refresh endpoint.
    pub fn refresh_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.refresh_path.trim_start_matches('/')
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for RouteSettings {
    fn default() -> Self {
        Self {
            entry: "/".to_string(),
            login: "/login".to_string(),
            home: "/dashboard".to_string(),
        }
    }
}
