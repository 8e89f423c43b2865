//! Core library for the `meteo` CLI.
//!
//! This crate defines:
//! - The Open-Meteo forecast fetcher
//! - Shaping of the raw response into current, daily and hourly views
//! - Configuration handling
//!
//! It is used by `meteo-cli`, but can also be reused by other binaries or services.

pub mod condition;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod model;
pub mod parse;
pub mod raw;

pub use condition::describe_weather_code;
pub use config::Config;
pub use error::ForecastError;
pub use fetcher::{WeatherFetcher, get_weather};
pub use model::{
    CurrentConditions, DailyForecastEntry, Forecast, ForecastRequest, HourlyForecastEntry,
};
pub use parse::{parse_current_weather, parse_daily_weather, parse_forecast, parse_hourly_weather};
pub use raw::RawForecastResponse;
