//! Typed schema for the Open-Meteo forecast body.
//!
//! Only the blocks we request are modelled. Sections and series are optional so
//! that a sparse body still decodes; series elements are nullable because
//! Open-Meteo emits `null` for values it cannot provide. `current_weather` is
//! decoded strictly. A `daily`/`hourly` section or series of the wrong shape is
//! dropped to `None` so the rest of the body survives.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;
use tracing::warn;

/// Wall-clock time as reported by the API, local to the requested timezone.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM` and `YYYY-MM-DDTHH:MM:SS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LocalTime(pub NaiveDateTime);

impl LocalTime {
    pub fn parse(s: &str) -> Option<Self> {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
            .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
            .map(Self)
    }

    /// Milliseconds since the Unix epoch, given the location's UTC offset.
    pub fn epoch_millis(self, utc_offset_seconds: i32) -> i64 {
        self.0.and_utc().timestamp_millis() - i64::from(utc_offset_seconds) * 1000
    }
}

impl<'de> Deserialize<'de> for LocalTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        LocalTime::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid forecast time `{s}`")))
    }
}

/// A parallel series; `None` entries are gaps in the API data.
pub type Series<T> = Vec<Option<T>>;

/// Decode `T`, or `None` when the value is null or has the wrong shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }

    match serde_json::from_value(value) {
        Ok(decoded) => Ok(Some(decoded)),
        Err(error) => {
            warn!(%error, "Ignoring malformed forecast data");
            Ok(None)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RawForecastResponse {
    #[serde(default)]
    pub utc_offset_seconds: i32,
    pub current_weather: Option<RawCurrentWeather>,
    #[serde(default, deserialize_with = "lenient")]
    pub daily: Option<RawDaily>,
    #[serde(default, deserialize_with = "lenient")]
    pub hourly: Option<RawHourly>,
}

#[derive(Debug, Deserialize)]
pub struct RawCurrentWeather {
    pub temperature: f64,
    pub windspeed: f64,
    pub weathercode: i32,
    pub time: LocalTime,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawDaily {
    #[serde(default, deserialize_with = "lenient")]
    pub time: Option<Vec<LocalTime>>,
    #[serde(default, deserialize_with = "lenient")]
    pub weather_code: Option<Series<i32>>,
    #[serde(default, deserialize_with = "lenient")]
    pub temperature_2m_max: Option<Series<f64>>,
    #[serde(default, deserialize_with = "lenient")]
    pub temperature_2m_min: Option<Series<f64>>,
    #[serde(default, deserialize_with = "lenient")]
    pub apparent_temperature_max: Option<Series<f64>>,
    #[serde(default, deserialize_with = "lenient")]
    pub apparent_temperature_min: Option<Series<f64>>,
    #[serde(default, deserialize_with = "lenient")]
    pub precipitation_sum: Option<Series<f64>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawHourly {
    #[serde(default, deserialize_with = "lenient")]
    pub time: Option<Vec<LocalTime>>,
    #[serde(default, deserialize_with = "lenient")]
    pub temperature_2m: Option<Series<f64>>,
    #[serde(default, deserialize_with = "lenient")]
    pub apparent_temperature: Option<Series<f64>>,
    #[serde(default, deserialize_with = "lenient")]
    pub precipitation: Option<Series<f64>>,
    #[serde(default, deserialize_with = "lenient")]
    pub weather_code: Option<Series<i32>>,
    #[serde(default, deserialize_with = "lenient")]
    pub wind_speed_10m: Option<Series<f64>>,
}
