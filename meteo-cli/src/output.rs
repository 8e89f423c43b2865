//! Human-readable rendering of a [`Forecast`].

use chrono::{DateTime, FixedOffset, Offset, Utc};
use meteo_core::{Forecast, HourlyForecastEntry, describe_weather_code};

pub fn render(forecast: &Forecast, hours: usize) -> String {
    let offset =
        FixedOffset::east_opt(forecast.utc_offset_seconds).unwrap_or_else(|| Utc.fix());
    let now = &forecast.current;

    let mut lines = vec![
        format!("Now: {}°  {}", now.current_temp, describe_weather_code(now.icon_code)),
        format!(
            "  High {}° / Low {}°   Feels like {}° / {}°",
            now.high_temp, now.low_temp, now.high_feels_like, now.low_feels_like
        ),
        format!("  Wind {}   Precip {:.2}", now.wind_speed, now.precip),
    ];

    if !forecast.daily.is_empty() {
        lines.push(String::new());
        lines.push("Daily:".to_string());
        for day in &forecast.daily {
            lines.push(format!(
                "  {:<12} {:>4}°  {}",
                local(day.timestamp, offset, "%a %d %b"),
                day.max_temp,
                describe_weather_code(day.icon_code)
            ));
        }
    }

    if hours > 0 && !forecast.hourly.is_empty() {
        lines.push(String::new());
        lines.push("Hourly:".to_string());
        for hour in forecast.hourly.iter().take(hours) {
            lines.push(hour_line(hour, offset));
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn hour_line(hour: &HourlyForecastEntry, offset: FixedOffset) -> String {
    format!(
        "  {}  {:>4}° (feels {}°)  wind {}  precip {}  {}",
        local(hour.timestamp, offset, "%H:%M"),
        or_dash(hour.temp),
        or_dash(hour.feels_like),
        or_dash(hour.wind_speed),
        hour.precip.map_or_else(|| "--".to_string(), |p| format!("{p:.2}")),
        hour.icon_code.map_or("", describe_weather_code),
    )
    .trim_end()
    .to_string()
}

fn local(timestamp: i64, offset: FixedOffset, fmt: &str) -> String {
    DateTime::from_timestamp_millis(timestamp)
        .map(|dt| dt.with_timezone(&offset).format(fmt).to_string())
        .unwrap_or_else(|| "??".to_string())
}

fn or_dash(value: Option<i32>) -> String {
    value.map_or_else(|| "--".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use meteo_core::{CurrentConditions, DailyForecastEntry};

    fn forecast() -> Forecast {
        Forecast {
            current: CurrentConditions {
                current_temp: 16,
                high_temp: 18,
                low_temp: 9,
                high_feels_like: 17,
                low_feels_like: 8,
                wind_speed: 10,
                precip: 1.23,
                icon_code: 3,
            },
            daily: vec![DailyForecastEntry {
                timestamp: 1_704_063_600_000,
                icon_code: 61,
                max_temp: 18,
            }],
            hourly: vec![
                HourlyForecastEntry {
                    timestamp: 1_704_110_400_000,
                    icon_code: Some(0),
                    temp: Some(17),
                    feels_like: Some(15),
                    wind_speed: Some(8),
                    precip: Some(0.4),
                },
                HourlyForecastEntry {
                    timestamp: 1_704_114_000_000,
                    icon_code: None,
                    temp: None,
                    feels_like: None,
                    wind_speed: None,
                    precip: None,
                },
            ],
            utc_offset_seconds: 3600,
        }
    }

    #[test]
    fn renders_in_location_local_time() {
        let text = render(&forecast(), 12);

        assert!(text.starts_with("Now: 16°  Overcast\n"));
        assert!(text.contains("Precip 1.23"));
        assert!(text.contains("Mon 01 Jan"));
        assert!(text.contains("Slight rain"));
        assert!(text.contains("  13:00    17° (feels 15°)  wind 8  precip 0.40  Clear sky"));
        assert!(text.contains("  14:00    --° (feels --°)  wind --  precip --\n"));
    }

    #[test]
    fn hours_limit_is_applied() {
        let text = render(&forecast(), 1);
        assert!(text.contains("13:00"));
        assert!(!text.contains("14:00"));

        let text = render(&forecast(), 0);
        assert!(!text.contains("Hourly:"));
    }
}
