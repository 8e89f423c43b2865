//! Shaping of a decoded forecast body into UI-ready views.
//!
//! `parse_current_weather` is strict: current conditions cannot be shown without
//! `current_weather` and day 0 of `daily`. The daily and hourly parsers are
//! best-effort and return an empty list when their section is unusable.

use tracing::warn;

use crate::{
    error::ForecastError,
    model::{CurrentConditions, DailyForecastEntry, Forecast, HourlyForecastEntry},
    raw::{RawForecastResponse, Series},
};

/// Build all three views from one decoded body.
pub fn parse_forecast(raw: &RawForecastResponse) -> Result<Forecast, ForecastError> {
    Ok(Forecast {
        current: parse_current_weather(raw)?,
        daily: parse_daily_weather(raw),
        hourly: parse_hourly_weather(raw),
        utc_offset_seconds: raw.utc_offset_seconds,
    })
}

pub fn parse_current_weather(raw: &RawForecastResponse) -> Result<CurrentConditions, ForecastError> {
    let current = raw
        .current_weather
        .as_ref()
        .ok_or_else(|| ForecastError::missing("current_weather"))?;
    let daily = raw.daily.as_ref().ok_or_else(|| ForecastError::missing("daily"))?;

    Ok(CurrentConditions {
        current_temp: round(current.temperature),
        high_temp: round(today(&daily.temperature_2m_max, "temperature_2m_max")?),
        low_temp: round(today(&daily.temperature_2m_min, "temperature_2m_min")?),
        high_feels_like: round(today(&daily.apparent_temperature_max, "apparent_temperature_max")?),
        low_feels_like: round(today(&daily.apparent_temperature_min, "apparent_temperature_min")?),
        wind_speed: round(current.windspeed),
        precip: round2(today(&daily.precipitation_sum, "precipitation_sum")?),
        icon_code: current.weathercode,
    })
}

pub fn parse_daily_weather(raw: &RawForecastResponse) -> Vec<DailyForecastEntry> {
    let Some(daily) = raw.daily.as_ref() else {
        warn!("Daily forecast is missing; returning no daily entries");
        return Vec::new();
    };

    let (Some(times), Some(codes), Some(maxes)) =
        (&daily.time, &daily.weather_code, &daily.temperature_2m_max)
    else {
        warn!("Daily forecast is incomplete; returning no daily entries");
        return Vec::new();
    };

    // Days without a code or a high are skipped; the rest keep their order.
    let entries: Vec<_> = times
        .iter()
        .enumerate()
        .filter_map(|(i, time)| {
            Some(DailyForecastEntry {
                timestamp: time.epoch_millis(raw.utc_offset_seconds),
                icon_code: value_at(codes, i)?,
                max_temp: round(value_at(maxes, i)?),
            })
        })
        .collect();

    if entries.len() < times.len() {
        warn!(
            skipped = times.len() - entries.len(),
            "Daily forecast series have gaps; skipping incomplete days"
        );
    }

    entries
}

pub fn parse_hourly_weather(raw: &RawForecastResponse) -> Vec<HourlyForecastEntry> {
    let Some(hourly) = raw.hourly.as_ref() else {
        warn!("Hourly forecast is missing; returning no hourly entries");
        return Vec::new();
    };

    let times = match hourly.time.as_deref() {
        Some(times) if !times.is_empty() => times,
        _ => {
            warn!("Hourly forecast has no times; returning no hourly entries");
            return Vec::new();
        }
    };

    let offset = raw.utc_offset_seconds;
    let now = raw.current_weather.as_ref().map(|c| c.time.epoch_millis(offset));

    times
        .iter()
        .enumerate()
        .map(|(i, time)| HourlyForecastEntry {
            timestamp: time.epoch_millis(offset),
            icon_code: lookup(&hourly.weather_code, i),
            temp: lookup(&hourly.temperature_2m, i).map(round),
            feels_like: lookup(&hourly.apparent_temperature, i).map(round),
            wind_speed: lookup(&hourly.wind_speed_10m, i).map(round),
            precip: lookup(&hourly.precipitation, i).map(round2),
        })
        .filter(|entry| now.is_none_or(|now| entry.timestamp >= now))
        .collect()
}

fn today(series: &Option<Series<f64>>, field: &str) -> Result<f64, ForecastError> {
    lookup(series, 0).ok_or_else(|| ForecastError::missing(&format!("daily.{field}[0]")))
}

fn lookup<T: Copy>(series: &Option<Series<T>>, index: usize) -> Option<T> {
    series.as_deref().and_then(|s| value_at(s, index))
}

fn value_at<T: Copy>(series: &[Option<T>], index: usize) -> Option<T> {
    series.get(index).copied().flatten()
}

/// Nearest integer, halves toward positive infinity.
fn round(value: f64) -> i32 {
    round_half_up(value) as i32
}

/// Two decimal places, halves toward positive infinity.
fn round2(value: f64) -> f64 {
    round_half_up(value * 100.0) / 100.0
}

// `f64::round` sends halves away from zero; pull negative halves back up.
fn round_half_up(value: f64) -> f64 {
    let rounded = value.round();
    if value - rounded == 0.5 { rounded + 1.0 } else { rounded }
}
