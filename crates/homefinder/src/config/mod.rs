use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub listings: ListingsConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let listings = ListingsConfig {
            source_path: optional_path("APP_LISTINGS_PATH"),
            guest_result_limit: limit_var(
                "APP_GUEST_RESULT_LIMIT",
                ListingsConfig::DEFAULT_GUEST_RESULT_LIMIT,
            )?,
            guest_fetch_limit: limit_var(
                "APP_GUEST_FETCH_LIMIT",
                ListingsConfig::DEFAULT_GUEST_FETCH_LIMIT,
            )?,
            member_fetch_limit: limit_var(
                "APP_MEMBER_FETCH_LIMIT",
                ListingsConfig::DEFAULT_MEMBER_FETCH_LIMIT,
            )?,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            listings,
            storage: StorageConfig {
                state_dir: optional_path("APP_STATE_DIR"),
            },
        })
    }
}

fn optional_path(name: &str) -> Option<PathBuf> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn limit_var(name: &'static str, default: usize) -> Result<usize, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidLimit { name }),
        Err(_) => Ok(default),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where listings come from and how much of the catalog each caller may browse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingsConfig {
    /// JSON or CSV file replacing the built-in seed dataset.
    pub source_path: Option<PathBuf>,
    /// Filtered results shown to callers without a session.
    pub guest_result_limit: usize,
    pub guest_fetch_limit: usize,
    pub member_fetch_limit: usize,
}

impl ListingsConfig {
    pub const DEFAULT_GUEST_RESULT_LIMIT: usize = 3;
    pub const DEFAULT_GUEST_FETCH_LIMIT: usize = 10;
    pub const DEFAULT_MEMBER_FETCH_LIMIT: usize = 100;
}

impl Default for ListingsConfig {
    fn default() -> Self {
        Self {
            source_path: None,
            guest_result_limit: Self::DEFAULT_GUEST_RESULT_LIMIT,
            guest_fetch_limit: Self::DEFAULT_GUEST_FETCH_LIMIT,
            member_fetch_limit: Self::DEFAULT_MEMBER_FETCH_LIMIT,
        }
    }
}

/// Backing medium for saved listings and the session record.
#[derive(Debug, Clone, Default)]
pub struct StorageConfig {
    /// Directory for file-backed stores; in-memory stores are used when unset.
    pub state_dir: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidLimit { name: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidLimit { name } => {
                write!(f, "{name} must be a non-negative integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidLimit { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
