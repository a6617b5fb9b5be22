//! Configuration loaded from the process environment.
//!
//! | variable                     | default        |
//! |------------------------------|----------------|
//! | `STOCKCAST_BIND_ADDR`        | `0.0.0.0:8080` |
//! | `STOCKCAST_LOG_FORMAT`       | `json`         |
//! | `STOCKCAST_FORECAST_WINDOW`  | `30`           |
//! | `STOCKCAST_TREND_MIN_EVENTS` | `14`           |
//! | `STOCKCAST_BUFFER`           | `1.1`          |
//! | `STOCKCAST_EXTENDED_BUFFER`  | `1.2`          |

use core::str::FromStr;
use std::net::SocketAddr;

use thiserror::Error;

use stockcast_forecast::ForecastConfig;
use stockcast_observability::LogFormat;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub log_format: LogFormat,
    pub forecast: ForecastConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            log_format: LogFormat::Json,
            forecast: ForecastConfig::default(),
        }
    }
}

fn parse<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: core::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            message: e.to_string(),
        }),
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key/value source (the environment in production).
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let forecast = ForecastConfig {
            window: parse(
                "STOCKCAST_FORECAST_WINDOW",
                lookup("STOCKCAST_FORECAST_WINDOW"),
                defaults.forecast.window,
            )?,
            trend_min_events: parse(
                "STOCKCAST_TREND_MIN_EVENTS",
                lookup("STOCKCAST_TREND_MIN_EVENTS"),
                defaults.forecast.trend_min_events,
            )?,
            buffer: parse(
                "STOCKCAST_BUFFER",
                lookup("STOCKCAST_BUFFER"),
                defaults.forecast.buffer,
            )?,
            extended_buffer: parse(
                "STOCKCAST_EXTENDED_BUFFER",
                lookup("STOCKCAST_EXTENDED_BUFFER"),
                defaults.forecast.extended_buffer,
            )?,
        };
        forecast.validate().map_err(|e| ConfigError::Invalid {
            key: "forecast",
            message: e.to_string(),
        })?;

        Ok(Self {
            bind_addr: parse(
                "STOCKCAST_BIND_ADDR",
                lookup("STOCKCAST_BIND_ADDR"),
                defaults.bind_addr,
            )?,
            log_format: parse(
                "STOCKCAST_LOG_FORMAT",
                lookup("STOCKCAST_LOG_FORMAT"),
                defaults.log_format,
            )?,
            forecast,
        })
    }
}
