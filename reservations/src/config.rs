//! Configuration management for the reservation service.
//!
//! Loads configuration from environment variables with sensible defaults. A
//! `.env` file in the working directory is read first when present.

use crate::admin::DEFAULT_PASSWORD;
use crate::reducer::BookingSettings;
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Longest table hold the configuration accepts
pub const MAX_TABLE_HOLD_MINUTES: i64 = 24 * 60;

/// Errors raised while reading configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed
    #[error("{key} has invalid value '{value}'")]
    Invalid {
        /// Variable name
        key: String,
        /// Raw value
        value: String,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application server configuration
    pub server: ServerConfig,
    /// Booking flow timings
    pub booking: BookingConfig,
    /// Admin gate configuration
    pub admin: AdminConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout: u64,
    /// How long a handler waits for a command outcome, in milliseconds
    pub request_timeout_ms: u64,
}

/// Booking flow configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    /// How long a new reservation holds its table, in minutes
    pub table_hold_minutes: i64,
    /// How long a submitted wizard shows its confirmation, in milliseconds
    pub reset_delay_ms: u64,
    /// Restaurant offset from UTC, in minutes
    pub utc_offset_minutes: i32,
}

/// Admin gate configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Shared admin password
    pub password: String,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a numeric variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is the normal case
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a numeric variable does not parse,
    /// or if the UTC offset or the table hold is out of range.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let config = Self {
            server: ServerConfig {
                host: text("HOST", "0.0.0.0"),
                port: parse(&lookup, "PORT", 8080)?,
                log_level: text("RUST_LOG", "info"),
                shutdown_timeout: parse(&lookup, "SHUTDOWN_TIMEOUT", 30)?,
                request_timeout_ms: parse(&lookup, "REQUEST_TIMEOUT_MS", 5000)?,
            },
            booking: BookingConfig {
                table_hold_minutes: parse(&lookup, "TABLE_HOLD_MINUTES", 120)?,
                reset_delay_ms: parse(&lookup, "BOOKING_RESET_DELAY_MS", 3000)?,
                utc_offset_minutes: parse(&lookup, "RESTAURANT_UTC_OFFSET_MINUTES", 60)?,
            },
            admin: AdminConfig {
                password: text("ADMIN_PASSWORD", DEFAULT_PASSWORD),
            },
        };

        // Out-of-range offsets and holds fail at load time, not on first use
        config.booking.utc_offset()?;
        config.booking.table_hold()?;
        Ok(config)
    }

    /// Server bind address
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl BookingConfig {
    /// Restaurant offset as a chrono offset
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for offsets of a day or more.
    pub fn utc_offset(&self) -> Result<FixedOffset, ConfigError> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| ConfigError::Invalid {
                key: "RESTAURANT_UTC_OFFSET_MINUTES".to_string(),
                value: self.utc_offset_minutes.to_string(),
            })
    }

    /// How long a new reservation holds its table
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] outside one minute to one day.
    pub fn table_hold(&self) -> Result<chrono::Duration, ConfigError> {
        if !(1..=MAX_TABLE_HOLD_MINUTES).contains(&self.table_hold_minutes) {
            return Err(ConfigError::Invalid {
                key: "TABLE_HOLD_MINUTES".to_string(),
                value: self.table_hold_minutes.to_string(),
            });
        }
        Ok(chrono::Duration::minutes(self.table_hold_minutes))
    }

    /// Reducer settings derived from this configuration
    ///
    /// # Errors
    ///
    /// See [`BookingConfig::utc_offset`] and [`BookingConfig::table_hold`].
    pub fn settings(&self) -> Result<BookingSettings, ConfigError> {
        Ok(BookingSettings {
            table_hold: self.table_hold()?,
            reset_delay: Duration::from_millis(self.reset_delay_ms),
            utc_offset: self.utc_offset()?,
        })
    }
}

fn parse<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            key: key.to_string(),
            value,
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.server.request_timeout_ms, 5000);
        assert_eq!(config.admin.password, "admin123");

        let settings = config.booking.settings().unwrap();
        assert_eq!(settings, BookingSettings::default());
        assert_eq!(settings.reset_delay, Duration::from_secs(3));
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("PORT", "3000"),
            ("TABLE_HOLD_MINUTES", "90"),
            ("RESTAURANT_UTC_OFFSET_MINUTES", "-300"),
            ("ADMIN_PASSWORD", "s3cret"),
        ])
        .unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.admin.password, "s3cret");
        let settings = config.booking.settings().unwrap();
        assert_eq!(settings.table_hold, chrono::Duration::minutes(90));
        assert_eq!(settings.utc_offset.local_minus_utc(), -300 * 60);
    }

    #[test]
    fn malformed_number_is_an_error() {
        let err = config(&[("PORT", "eighty")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "PORT".to_string(),
                value: "eighty".to_string()
            }
        );
    }

    #[test]
    fn table_hold_must_be_within_a_day() {
        for value in ["0", "-120", "1441", "9223372036854775807"] {
            let err = config(&[("TABLE_HOLD_MINUTES", value)]).unwrap_err();
            assert_eq!(
                err,
                ConfigError::Invalid {
                    key: "TABLE_HOLD_MINUTES".to_string(),
                    value: value.to_string()
                }
            );
        }

        let config = config(&[("TABLE_HOLD_MINUTES", "1440")]).unwrap();
        assert_eq!(config.booking.settings().unwrap().table_hold, chrono::Duration::days(1));
    }

    #[test]
    fn settings_recheck_the_hold() {
        let mut config = config(&[]).unwrap();
        config.booking.table_hold_minutes = -5;
        assert!(config.booking.settings().is_err());
    }

    #[test]
    fn offset_out_of_range_is_an_error() {
        assert!(config(&[("RESTAURANT_UTC_OFFSET_MINUTES", "1440")]).is_err());
    }
}
