//! # API Configuration Module
//!
//! This module handles loading and managing configuration for the Vetbook API
//! server. It retrieves configuration values from environment variables and
//! provides defaults where appropriate.
//!
//! ## Environment Variables
//!
//! The following environment variables are used:
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Request timeout (default: 30)
//!
//! Providers that never had a weekly template configured fall back to a
//! default schedule, which is itself configuration rather than a hard-coded
//! literal:
//!
//! - `DEFAULT_DAY_START` / `DEFAULT_DAY_END`: working window (default
//!   "09:00" / "17:00", Monday through Friday)
//! - `DEFAULT_BREAK_START` / `DEFAULT_BREAK_END`: midday break (default
//!   "12:00" / "13:00"; set both empty to disable)
//! - `DEFAULT_SLOT_MINUTES`: slot duration (default 30)
//! - `DEFAULT_BUFFER_MINUTES`: buffer between slots (default 0)

use eyre::{Result, WrapErr, eyre};
use std::env;
use tracing::Level;
use vetbook_core::models::schedule::DayConfig;
use vetbook_core::models::time::TimeOfDay;

/// Configuration for the Vetbook API server
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Fallback weekly schedule for providers without a template
    pub default_schedule: DefaultScheduleConfig,
}

/// The fallback schedule applied to providers without a weekly template.
#[derive(Debug, Clone)]
pub struct DefaultScheduleConfig {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub break_start: Option<TimeOfDay>,
    pub break_end: Option<TimeOfDay>,
    pub slot_minutes: u16,
    pub buffer_minutes: u16,
}

impl DefaultScheduleConfig {
    fn from_env() -> Result<Self> {
        let start = parse_time_var("DEFAULT_DAY_START", "09:00")?;
        let end = parse_time_var("DEFAULT_DAY_END", "17:00")?;
        let break_start = parse_optional_time_var("DEFAULT_BREAK_START", Some("12:00"))?;
        let break_end = parse_optional_time_var("DEFAULT_BREAK_END", Some("13:00"))?;

        if break_start.is_some() != break_end.is_some() {
            return Err(eyre!(
                "DEFAULT_BREAK_START and DEFAULT_BREAK_END must be set together"
            ));
        }

        let slot_minutes = env::var("DEFAULT_SLOT_MINUTES")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .wrap_err("Invalid DEFAULT_SLOT_MINUTES value")?;
        let buffer_minutes = env::var("DEFAULT_BUFFER_MINUTES")
            .unwrap_or_else(|_| "0".to_string())
            .parse()
            .wrap_err("Invalid DEFAULT_BUFFER_MINUTES value")?;

        Ok(Self {
            start,
            end,
            break_start,
            break_end,
            slot_minutes,
            buffer_minutes,
        })
    }

    /// Expands the config into the seven day configs of a weekly template:
    /// Monday through Friday working, the weekend inactive.
    pub fn days(&self) -> Vec<DayConfig> {
        (0..7)
            .map(|weekday| DayConfig {
                active: weekday < 5,
                start: self.start,
                end: self.end,
                break_start: self.break_start,
                break_end: self.break_end,
                slot_minutes: self.slot_minutes,
                buffer_minutes: self.buffer_minutes,
                max_per_day: None,
            })
            .collect()
    }
}

fn parse_time_var(name: &str, default: &str) -> Result<TimeOfDay> {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|e| eyre!("Invalid {} value: {}", name, e))
}

fn parse_optional_time_var(name: &str, default: Option<&str>) -> Result<Option<TimeOfDay>> {
    let value = match env::var(name) {
        Ok(value) => value,
        Err(_) => default.unwrap_or_default().to_string(),
    };
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|e| eyre!("Invalid {} value: {}", name, e))
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The DATABASE_URL environment variable is not set
    /// - The API_PORT value cannot be parsed as a u16
    /// - Any default-schedule value cannot be parsed
    pub fn from_env() -> Result<Self> {
        // Network settings
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url = env::var("DATABASE_URL")
            .wrap_err("DATABASE_URL environment variable must be set")?;

        // Logging settings
        let log_level = match env::var("LOG_LEVEL")
            .unwrap_or_else(|_| "info".to_string())
            .as_str()
        {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        // CORS settings
        let cors_origins = env::var("API_CORS_ORIGINS")
            .ok()
            .map(|origins| origins.split(',').map(|s| s.trim().to_string()).collect());

        // Performance settings
        let request_timeout = env::var("API_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        // Scheduling fallback
        let default_schedule = DefaultScheduleConfig::from_env()?;

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
            default_schedule,
        })
    }

    /// Returns the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
