use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::workflows::booking::domain::{VillaListing, MAX_GUESTS_PER_BOOKING};

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
    pub booking: BookingConfig,
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
        let log_format = LogFormat::from_str(
            &env::var("APP_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string()),
        );

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                log_format,
            },
            booking: BookingConfig::from_env()?,
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Compact,
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_format: LogFormat,
}

/// The villa on offer and the limits applied to each booking session.
#[derive(Debug, Clone)]
pub struct BookingConfig {
    pub villa_id: String,
    pub villa_name: String,
    /// Whole rupiah per night.
    pub nightly_rate: u64,
    pub max_guests: u8,
    pub submission_timeout: Duration,
}

impl BookingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let villa_id = env::var("BOOKING_VILLA_ID").unwrap_or_else(|_| "villa-serenity".to_string());
        let villa_name =
            env::var("BOOKING_VILLA_NAME").unwrap_or_else(|_| "Villa Serenity".to_string());

        let nightly_rate = env::var("BOOKING_NIGHTLY_RATE")
            .unwrap_or_else(|_| "2000000".to_string())
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|rate| *rate > 0)
            .ok_or(ConfigError::InvalidNightlyRate)?;

        let max_guests = env::var("BOOKING_MAX_GUESTS")
            .unwrap_or_else(|_| MAX_GUESTS_PER_BOOKING.to_string())
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|guests| (1..=MAX_GUESTS_PER_BOOKING).contains(guests))
            .ok_or(ConfigError::InvalidMaxGuests)?;

        let timeout_ms = env::var("BOOKING_SUBMISSION_TIMEOUT_MS")
            .unwrap_or_else(|_| "5000".to_string())
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|ms| *ms > 0)
            .ok_or(ConfigError::InvalidSubmissionTimeout)?;

        Ok(Self {
            villa_id,
            villa_name,
            nightly_rate,
            max_guests,
            submission_timeout: Duration::from_millis(timeout_ms),
        })
    }

    pub fn listing(&self) -> VillaListing {
        VillaListing {
            id: self.villa_id.clone(),
            name: self.villa_name.clone(),
            nightly_rate: self.nightly_rate,
            max_guests: self.max_guests,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNightlyRate,
    InvalidMaxGuests,
    InvalidSubmissionTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNightlyRate => {
                write!(f, "BOOKING_NIGHTLY_RATE must be a positive whole amount")
            }
            ConfigError::InvalidMaxGuests => write!(
                f,
                "BOOKING_MAX_GUESTS must be between 1 and {}",
                MAX_GUESTS_PER_BOOKING
            ),
            ConfigError::InvalidSubmissionTimeout => write!(
                f,
                "BOOKING_SUBMISSION_TIMEOUT_MS must be a positive number of milliseconds"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
