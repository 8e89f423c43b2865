use reqwest::Client;
use tracing::{debug, info};

use crate::{
    config::Config,
    error::ForecastError,
    model::{Forecast, ForecastRequest},
    parse::parse_forecast,
    raw::RawForecastResponse,
};

pub const FORECAST_ENDPOINT: &str = "https://api.open-meteo.com/v1/forecast";

/// Hourly series requested from the API. Must stay in sync with `RawHourly`.
pub const HOURLY_FIELDS: &str =
    "temperature_2m,apparent_temperature,precipitation,weather_code,wind_speed_10m";

/// Daily series requested from the API. Must stay in sync with `RawDaily`.
pub const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,apparent_temperature_max,\
                                apparent_temperature_min,precipitation_sum,weather_code";

#[derive(Debug, Clone)]
pub struct WeatherFetcher {
    http: Client,
    endpoint: String,
}

impl Default for WeatherFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherFetcher {
    pub fn new() -> Self {
        Self { http: Client::new(), endpoint: FORECAST_ENDPOINT.to_string() }
    }

    /// Point the fetcher at another forecast URL, e.g. a self-hosted Open-Meteo.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Build a fetcher honoring the configured endpoint and timeout.
    pub fn from_config(config: &Config) -> Result<Self, ForecastError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self { http: builder.build()?, endpoint: config.endpoint().to_string() })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch and shape the forecast for one location.
    pub async fn fetch(&self, request: &ForecastRequest) -> Result<Forecast, ForecastError> {
        info!(
            latitude = request.latitude,
            longitude = request.longitude,
            timezone = %request.timezone,
            "Fetching forecast"
        );

        let latitude = request.latitude.to_string();
        let longitude = request.longitude.to_string();

        let res = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("current_weather", "true"),
                ("hourly", HOURLY_FIELDS),
                ("daily", DAILY_FIELDS),
                ("timezone", request.timezone.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        debug!(%status, bytes = body.len(), "Forecast response received");

        if !status.is_success() {
            return Err(ForecastError::Status { status, body: truncate_body(&body) });
        }

        let raw: RawForecastResponse = serde_json::from_str(&body)?;
        parse_forecast(&raw)
    }
}

/// One-shot fetch with default client settings.
pub async fn get_weather(
    latitude: f64,
    longitude: f64,
    timezone: &str,
) -> Result<Forecast, ForecastError> {
    WeatherFetcher::new().fetch(&ForecastRequest::new(latitude, longitude, timezone)).await
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn body() -> serde_json::Value {
        json!({
            "latitude": 52.52,
            "longitude": 13.419998,
            "utc_offset_seconds": 0,
            "timezone": "GMT",
            "current_weather": {
                "temperature": 15.6,
                "windspeed": 10.2,
                "winddirection": 250,
                "weathercode": 3,
                "is_day": 1,
                "time": "2024-01-01T12:00"
            },
            "hourly": {
                "time": ["2024-01-01T10:00", "2024-01-01T13:00"],
                "temperature_2m": [12.1, 16.0],
                "apparent_temperature": [10.0, 14.6],
                "precipitation": [0.0, 0.2],
                "weather_code": [2, 3],
                "wind_speed_10m": [8.1, 11.9]
            },
            "daily": {
                "time": ["2024-01-01", "2024-01-02"],
                "temperature_2m_max": [18.4, 17.2],
                "temperature_2m_min": [9.1, 8.3],
                "apparent_temperature_max": [17.0, 16.1],
                "apparent_temperature_min": [8.0, 6.9],
                "precipitation_sum": [1.234, 0.0],
                "weather_code": [3, 61]
            }
        })
    }

    fn fetcher_for(server: &MockServer) -> WeatherFetcher {
        WeatherFetcher::new().with_endpoint(format!("{}/v1/forecast", server.uri()))
    }

    #[tokio::test]
    async fn fetch_sends_fixed_query_and_shapes_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "52.52"))
            .and(query_param("longitude", "13.41"))
            .and(query_param("current_weather", "true"))
            .and(query_param("hourly", HOURLY_FIELDS))
            .and(query_param("daily", DAILY_FIELDS))
            .and(query_param("timezone", "Europe/Berlin"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body()))
            .expect(1)
            .mount(&server)
            .await;

        let forecast = fetcher_for(&server)
            .fetch(&ForecastRequest::new(52.52, 13.41, "Europe/Berlin"))
            .await
            .unwrap();

        assert_eq!(forecast.current.current_temp, 16);
        assert_eq!(forecast.current.precip, 1.23);
        assert_eq!(forecast.daily.len(), 2);
        assert_eq!(forecast.daily[1].icon_code, 61);
        assert_eq!(forecast.hourly.len(), 1);
        assert_eq!(forecast.hourly[0].temp, Some(16));
    }

    #[tokio::test]
    async fn non_success_status_is_a_network_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({ "error": true, "reason": "Invalid timezone" })),
            )
            .mount(&server)
            .await;

        let err = fetcher_for(&server)
            .fetch(&ForecastRequest::new(0.0, 0.0, "Mars/Olympus"))
            .await
            .unwrap_err();

        assert!(err.is_network());
        match err {
            ForecastError::Status { status, body } => {
                assert_eq!(status.as_u16(), 400);
                assert!(body.contains("Invalid timezone"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_network_error() {
        let fetcher = WeatherFetcher::new().with_endpoint("http://127.0.0.1:1/v1/forecast");

        let err = fetcher.fetch(&ForecastRequest::new(0.0, 0.0, "auto")).await.unwrap_err();

        assert!(matches!(err, ForecastError::Network(_)));
    }

    #[tokio::test]
    async fn missing_current_weather_is_malformed() {
        let server = MockServer::start().await;
        let mut partial = body();
        partial.as_object_mut().unwrap().remove("current_weather");

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(partial))
            .mount(&server)
            .await;

        let err = fetcher_for(&server)
            .fetch(&ForecastRequest::new(0.0, 0.0, "auto"))
            .await
            .unwrap_err();

        assert!(matches!(err, ForecastError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn non_json_body_is_a_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let err = fetcher_for(&server)
            .fetch(&ForecastRequest::new(0.0, 0.0, "auto"))
            .await
            .unwrap_err();

        assert!(matches!(err, ForecastError::Decode(_)));
    }

    #[test]
    fn from_config_uses_configured_endpoint() {
        let cfg = Config { endpoint: Some("http://localhost:8080/v1/forecast".into()), ..Config::default() };
        let fetcher = WeatherFetcher::from_config(&cfg).unwrap();
        assert_eq!(fetcher.endpoint(), "http://localhost:8080/v1/forecast");

        let fetcher = WeatherFetcher::from_config(&Config::default()).unwrap();
        assert_eq!(fetcher.endpoint(), FORECAST_ENDPOINT);
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let truncated = truncate_body(&long);
        assert_eq!(truncated.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
