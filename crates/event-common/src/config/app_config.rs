//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when
//! one is present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub ticket: TicketConfig,
    pub smtp: SmtpConfig,
    pub storage: StorageConfig,
    pub notification: NotificationConfig,
    pub cors: CorsConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
    /// Externally reachable base URL, used to build signed image links
    pub public_base_url: String,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Session JWT configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry: i64,
}

/// Reservation ticket signing
#[derive(Debug, Clone, Deserialize)]
pub struct TicketConfig {
    pub secret: String,
    #[serde(default = "default_ticket_ttl_hours")]
    pub ttl_hours: i64,
}

/// Outgoing mail relay
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub server: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Sender address
    pub from: String,
    /// Sender display name
    #[serde(default = "default_from_name")]
    pub from_name: String,
}

/// Image storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    #[serde(default = "default_max_file_size")]
    pub max_file_size_mb: u32,
    /// Lifetime of a signed image link
    #[serde(default = "default_url_ttl_secs")]
    pub url_ttl_secs: u64,
    /// Key for signing image links
    pub url_secret: String,
}

impl StorageConfig {
    #[must_use]
    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_mb as usize * 1024 * 1024
    }
}

/// Reminder scheduler timing
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_scan_interval_secs")]
    pub scan_interval_secs: u64,
    #[serde(default = "default_dispatch_interval_secs")]
    pub dispatch_interval_secs: u64,
    /// How far ahead of now a periodic scan looks
    #[serde(default = "default_lookahead_secs")]
    pub lookahead_secs: u64,
    /// Half-width of the window around an event start in which reminders go out
    #[serde(default = "default_dispatch_window_secs")]
    pub dispatch_window_secs: u64,
    #[serde(default = "default_store_timeout_secs")]
    pub store_timeout_secs: u64,
    #[serde(default = "default_max_concurrent_sends")]
    pub max_concurrent_sends: usize,
    /// Failed deliveries after which a reminder is given up; unbounded when unset
    #[serde(default)]
    pub max_attempts: Option<u32>,
}

impl NotificationConfig {
    #[must_use]
    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_secs)
    }

    #[must_use]
    pub fn dispatch_interval(&self) -> Duration {
        Duration::from_secs(self.dispatch_interval_secs)
    }

    #[must_use]
    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            scan_interval_secs: default_scan_interval_secs(),
            dispatch_interval_secs: default_dispatch_interval_secs(),
            lookahead_secs: default_lookahead_secs(),
            dispatch_window_secs: default_dispatch_window_secs(),
            store_timeout_secs: default_store_timeout_secs(),
            max_concurrent_sends: default_max_concurrent_sends(),
            max_attempts: None,
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

// Default value functions
fn default_app_name() -> String {
    "event-server".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_access_token_expiry() -> i64 {
    900 // 15 minutes
}

fn default_refresh_token_expiry() -> i64 {
    604800 // 7 days
}

fn default_ticket_ttl_hours() -> i64 {
    24
}

fn default_smtp_port() -> u16 {
    465
}

fn default_from_name() -> String {
    "Events".to_string()
}

fn default_upload_dir() -> String {
    "./uploads".to_string()
}

fn default_max_file_size() -> u32 {
    10
}

fn default_url_ttl_secs() -> u64 {
    3600
}

fn default_scan_interval_secs() -> u64 {
    7200 // 2 hours
}

fn default_dispatch_interval_secs() -> u64 {
    3600 // 1 hour
}

fn default_lookahead_secs() -> u64 {
    21600 // 6 hours
}

fn default_dispatch_window_secs() -> u64 {
    10800 // 3 hours
}

fn default_store_timeout_secs() -> u64 {
    10
}

fn default_max_concurrent_sends() -> usize {
    8
}

/// Read a required variable
fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingVar(key))
}

/// Read and parse an optional variable, rejecting values that do not parse
fn parsed<T: FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        Err(_) => Ok(None),
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or
    /// a numeric variable does not parse
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = env::var("API_HOST").unwrap_or_else(|_| default_host());
        let port: u16 = parsed("API_PORT")?.ok_or(ConfigError::MissingVar("API_PORT"))?;
        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://{host}:{port}"))
            .trim_end_matches('/')
            .to_string();

        let jwt_secret = required("JWT_SECRET")?;

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            api: ServerConfig {
                host,
                port,
                public_base_url,
            },
            database: DatabaseConfig {
                url: required("DATABASE_URL")?,
                max_connections: parsed("DATABASE_MAX_CONNECTIONS")?
                    .unwrap_or_else(default_max_connections),
                min_connections: parsed("DATABASE_MIN_CONNECTIONS")?
                    .unwrap_or_else(default_min_connections),
            },
            ticket: TicketConfig {
                secret: required("TICKET_SECRET")?,
                ttl_hours: parsed("TICKET_TTL_HOURS")?.unwrap_or_else(default_ticket_ttl_hours),
            },
            smtp: SmtpConfig {
                server: required("SMTP_SERVER")?,
                port: parsed("SMTP_PORT")?.unwrap_or_else(default_smtp_port),
                username: env::var("SMTP_USERNAME").unwrap_or_default(),
                password: env::var("SMTP_PASSWORD").unwrap_or_default(),
                from: required("SMTP_FROM")?,
                from_name: env::var("SMTP_FROM_NAME").unwrap_or_else(|_| default_from_name()),
            },
            storage: StorageConfig {
                upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| default_upload_dir()),
                max_file_size_mb: parsed("MAX_FILE_SIZE_MB")?
                    .unwrap_or_else(default_max_file_size),
                url_ttl_secs: parsed("IMAGE_URL_TTL_SECS")?.unwrap_or_else(default_url_ttl_secs),
                url_secret: env::var("IMAGE_URL_SECRET").unwrap_or_else(|_| jwt_secret.clone()),
            },
            notification: NotificationConfig {
                scan_interval_secs: parsed("NOTIFY_SCAN_INTERVAL_SECS")?
                    .unwrap_or_else(default_scan_interval_secs),
                dispatch_interval_secs: parsed("NOTIFY_DISPATCH_INTERVAL_SECS")?
                    .unwrap_or_else(default_dispatch_interval_secs),
                lookahead_secs: parsed("NOTIFY_LOOKAHEAD_SECS")?
                    .unwrap_or_else(default_lookahead_secs),
                dispatch_window_secs: parsed("NOTIFY_DISPATCH_WINDOW_SECS")?
                    .unwrap_or_else(default_dispatch_window_secs),
                store_timeout_secs: parsed("NOTIFY_STORE_TIMEOUT_SECS")?
                    .unwrap_or_else(default_store_timeout_secs),
                max_concurrent_sends: parsed("NOTIFY_MAX_CONCURRENT_SENDS")?
                    .unwrap_or_else(default_max_concurrent_sends),
                max_attempts: parsed("NOTIFY_MAX_ATTEMPTS")?,
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                access_token_expiry: parsed("JWT_ACCESS_TOKEN_EXPIRY")?
                    .unwrap_or_else(default_access_token_expiry),
                refresh_token_expiry: parsed("JWT_REFRESH_TOKEN_EXPIRY")?
                    .unwrap_or_else(default_refresh_token_expiry),
            },
            cors: CorsConfig {
                allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .ok()
                    .map(|s| s.split(',').map(str::trim).map(String::from).collect())
                    .unwrap_or_default(),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_is_production() {
        assert!(!Environment::Development.is_production());
        assert!(!Environment::Staging.is_production());
        assert!(Environment::Production.is_production());
    }

    #[test]
    fn test_server_address() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
            public_base_url: "http://localhost:8080".to_string(),
        };
        assert_eq!(config.address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_notification_defaults() {
        let config = NotificationConfig::default();
        assert_eq!(config.scan_interval(), Duration::from_secs(2 * 3600));
        assert_eq!(config.dispatch_interval(), Duration::from_secs(3600));
        assert_eq!(config.lookahead_secs, 6 * 3600);
        assert_eq!(config.dispatch_window_secs, 3 * 3600);
        assert_eq!(config.store_timeout(), Duration::from_secs(10));
        assert_eq!(config.max_concurrent_sends, 8);
        assert!(config.max_attempts.is_none());
    }

    #[test]
    fn test_default_values() {
        assert_eq!(default_app_name(), "event-server");
        assert_eq!(default_ticket_ttl_hours(), 24);
        assert_eq!(default_url_ttl_secs(), 3600);
        assert_eq!(default_access_token_expiry(), 900);
    }

    #[test]
    fn test_parsed_rejects_garbage() {
        env::set_var("EVENT_COMMON_TEST_PARSED", "not-a-number");
        let result: Result<Option<u64>, _> = parsed("EVENT_COMMON_TEST_PARSED");
        assert!(matches!(result, Err(ConfigError::InvalidValue(_, _))));

        env::set_var("EVENT_COMMON_TEST_PARSED", " 42 ");
        let result: Option<u64> = parsed("EVENT_COMMON_TEST_PARSED").unwrap();
        assert_eq!(result, Some(42));

        env::remove_var("EVENT_COMMON_TEST_PARSED");
        let result: Option<u64> = parsed("EVENT_COMMON_TEST_PARSED").unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_storage_size_in_bytes() {
        let storage = StorageConfig {
            upload_dir: default_upload_dir(),
            max_file_size_mb: 2,
            url_ttl_secs: default_url_ttl_secs(),
            url_secret: "s".to_string(),
        };
        assert_eq!(storage.max_file_size_bytes(), 2 * 1024 * 1024);
    }
}
