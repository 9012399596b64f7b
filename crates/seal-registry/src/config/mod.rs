use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::registry::DEFAULT_MAX_SEAL_IMAGE_BYTES;

const DEFAULT_PORT: &str = "8787";
const DEFAULT_REGISTRATION_NUMBER_START: u64 = 20_250_001;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://localhost:3000";
const DEFAULT_CERTIFICATE_ISSUER: &str = "○○市長";

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
    pub registry: RegistryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| DEFAULT_PORT.to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;
        let allowed_origins = parse_origins(
            &env::var("APP_CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let seed_sample_data = match env::var("APP_SEED_SAMPLE_DATA") {
            Ok(raw) => parse_flag("APP_SEED_SAMPLE_DATA", &raw)?,
            Err(_) => true,
        };
        let registration_number_start = match env::var("APP_REGISTRATION_NUMBER_START") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidRegistrationNumberStart)?,
            Err(_) => DEFAULT_REGISTRATION_NUMBER_START,
        };
        let max_seal_image_bytes = match env::var("APP_MAX_SEAL_IMAGE_BYTES") {
            Ok(raw) => match raw.trim().parse::<usize>() {
                Ok(limit) if limit > 0 => limit,
                _ => return Err(ConfigError::InvalidUploadLimit),
            },
            Err(_) => DEFAULT_MAX_SEAL_IMAGE_BYTES,
        };
        let certificate_issuer = env::var("APP_CERTIFICATE_ISSUER")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_CERTIFICATE_ISSUER.to_string());

        Ok(Self {
            environment,
            server: ServerConfig {
                host,
                port,
                allowed_origins,
            },
            telemetry: TelemetryConfig { log_level },
            registry: RegistryConfig {
                seed_sample_data,
                registration_number_start,
                max_seal_image_bytes,
                certificate_issuer,
            },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Browser origins allowed by the CORS layer.
    pub allowed_origins: Vec<String>,
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

/// Knobs for the registration workflow itself.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Load the sample residents into the store at startup.
    pub seed_sample_data: bool,
    /// First registration number handed out by immediate registrations.
    pub registration_number_start: u64,
    /// Upper bound for uploaded seal images, in bytes.
    pub max_seal_image_bytes: usize,
    /// Issuing authority printed at the foot of certificates.
    pub certificate_issuer: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            seed_sample_data: true,
            registration_number_start: DEFAULT_REGISTRATION_NUMBER_START,
            max_seal_image_bytes: DEFAULT_MAX_SEAL_IMAGE_BYTES,
            certificate_issuer: DEFAULT_CERTIFICATE_ISSUER.to_string(),
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { name }),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidFlag { name: &'static str },
    InvalidRegistrationNumberStart,
    InvalidUploadLimit,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidFlag { name } => {
                write!(f, "{name} must be one of true/false/1/0/yes/no/on/off")
            }
            ConfigError::InvalidRegistrationNumberStart => {
                write!(f, "APP_REGISTRATION_NUMBER_START must be a non-negative integer")
            }
            ConfigError::InvalidUploadLimit => {
                write!(f, "APP_MAX_SEAL_IMAGE_BYTES must be a positive integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidFlag { .. }
            | ConfigError::InvalidRegistrationNumberStart
            | ConfigError::InvalidUploadLimit => None,
        }
    }
}
