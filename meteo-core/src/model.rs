use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub latitude: f64,
    pub longitude: f64,
    /// IANA timezone name, or `auto` to let the API pick from the coordinates.
    pub timezone: String,
}

impl ForecastRequest {
    pub fn new(latitude: f64, longitude: f64, timezone: impl Into<String>) -> Self {
        Self { latitude, longitude, timezone: timezone.into() }
    }
}

/// "Right now" plus today's extremes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    pub current_temp: i32,
    pub high_temp: i32,
    pub low_temp: i32,
    pub high_feels_like: i32,
    pub low_feels_like: i32,
    pub wind_speed: i32,
    pub precip: f64,
    pub icon_code: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecastEntry {
    /// Local midnight of the day at the response's `utc_offset_seconds`, as epoch
    /// millis. Equals UTC midnight of the date only when the offset is 0.
    pub timestamp: i64,
    pub icon_code: i32,
    pub max_temp: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyForecastEntry {
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_code: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feels_like: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precip: Option<f64>,
}

/// Everything one fetch produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    pub current: CurrentConditions,
    pub daily: Vec<DailyForecastEntry>,
    pub hourly: Vec<HourlyForecastEntry>,
    /// Offset of the location's timezone, for rendering timestamps as local time.
    pub utc_offset_seconds: i32,
}
