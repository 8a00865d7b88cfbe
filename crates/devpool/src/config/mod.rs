use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::workflows::allocation::{BrowserSettings, WorkSchedule};

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
    pub pool: PoolConfig,
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
            pool: PoolConfig::from_env()?,
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Pool browsing defaults and the work schedule seeded into bulk proposals.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolConfig {
    pub page_size: usize,
    pub search_debounce: Duration,
    pub schedule: WorkSchedule,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            page_size: 50,
            search_debounce: Duration::from_millis(300),
            schedule: WorkSchedule::default(),
        }
    }
}

impl PoolConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let page_size = parse_var("APP_POOL_PAGE_SIZE", defaults.page_size)?;
        if page_size == 0 {
            return Err(ConfigError::InvalidValue {
                variable: "APP_POOL_PAGE_SIZE",
                value: "0".to_string(),
            });
        }

        let debounce_ms = parse_var(
            "APP_SEARCH_DEBOUNCE_MS",
            defaults.search_debounce.as_millis() as u64,
        )?;

        let schedule = WorkSchedule {
            working_days_per_month: parse_var(
                "APP_WORKING_DAYS_PER_MONTH",
                defaults.schedule.working_days_per_month,
            )?,
            hours_per_day: parse_var("APP_HOURS_PER_DAY", defaults.schedule.hours_per_day)?,
            currency: env::var("APP_CURRENCY").unwrap_or(defaults.schedule.currency),
        };
        schedule
            .validate()
            .map_err(|source| ConfigError::InvalidSchedule { source })?;

        Ok(Self {
            page_size,
            search_debounce: Duration::from_millis(debounce_ms),
            schedule,
        })
    }

    pub fn browser_settings(&self) -> BrowserSettings {
        BrowserSettings {
            page_size: self.page_size,
            search_debounce: self.search_debounce,
        }
    }
}

fn parse_var<T: std::str::FromStr>(variable: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(variable) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue {
                variable,
                value: raw,
            }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    InvalidValue {
        variable: &'static str,
        value: String,
    },
    InvalidSchedule {
        source: crate::workflows::allocation::ScheduleError,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidValue { variable, value } => {
                write!(f, "{variable} has an invalid value '{value}'")
            }
            ConfigError::InvalidSchedule { source } => {
                write!(f, "default work schedule is invalid: {source}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidValue { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidSchedule { source } => Some(source),
        }
    }
}

/// Serialises tests that mutate process environment variables.
#[cfg(test)]
pub(crate) fn env_guard() -> &'static std::sync::Mutex<()> {
    static GUARD: std::sync::OnceLock<std::sync::Mutex<()>> = std::sync::OnceLock::new();
    GUARD.get_or_init(|| std::sync::Mutex::new(()))
}
