use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_REGISTRY_TIMEOUT_MS: u64 = 2_000;
const DEFAULT_ACTIVE_SIRETS: &str = "73282932000074";

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
    pub validation: ValidationSettings,
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

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            validation: ValidationSettings::from_env()?,
        })
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Reference-data sources and registry settings for the validation coordinator.
///
/// Unset CSV paths fall back to the built-in reference lists.
#[derive(Debug, Clone)]
pub struct ValidationSettings {
    pub disposable_domains_csv: Option<PathBuf>,
    pub suspicious_markers_csv: Option<PathBuf>,
    pub siret_reject_list_csv: Option<PathBuf>,
    pub registry_timeout: Duration,
    pub active_sirets: Vec<String>,
}

impl ValidationSettings {
    fn from_env() -> Result<Self, ConfigError> {
        let registry_timeout = match env::var("ONBOARDING_REGISTRY_TIMEOUT_MS") {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(millis) if millis > 0 => Duration::from_millis(millis),
                _ => return Err(ConfigError::InvalidRegistryTimeout { value: raw }),
            },
            Err(_) => Duration::from_millis(DEFAULT_REGISTRY_TIMEOUT_MS),
        };

        let active_sirets = env::var("ONBOARDING_ACTIVE_SIRETS")
            .unwrap_or_else(|_| DEFAULT_ACTIVE_SIRETS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            disposable_domains_csv: optional_path("ONBOARDING_DISPOSABLE_DOMAINS_CSV"),
            suspicious_markers_csv: optional_path("ONBOARDING_SUSPICIOUS_MARKERS_CSV"),
            siret_reject_list_csv: optional_path("ONBOARDING_SIRET_REJECT_LIST_CSV"),
            registry_timeout,
            active_sirets,
        })
    }
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            disposable_domains_csv: None,
            suspicious_markers_csv: None,
            siret_reject_list_csv: None,
            registry_timeout: Duration::from_millis(DEFAULT_REGISTRY_TIMEOUT_MS),
            active_sirets: vec![DEFAULT_ACTIVE_SIRETS.to_string()],
        }
    }
}

fn optional_path(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidRegistryTimeout { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidRegistryTimeout { value } => write!(
                f,
                "ONBOARDING_REGISTRY_TIMEOUT_MS must be a positive integer, got '{}'",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidRegistryTimeout { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
