use reqwest::StatusCode;

/// Errors returned by [`crate::WeatherFetcher`] and the response parsers.
#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    /// Transport-level failure: DNS, connection refused, timeout, body read.
    #[error("Failed to reach the forecast endpoint: {0}")]
    Network(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status.
    #[error("Forecast request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The body is not JSON, or does not match the forecast schema.
    #[error("Failed to decode forecast response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The body decoded, but a value required for current conditions is missing.
    #[error("Malformed forecast response: {0}")]
    MalformedResponse(String),
}

impl ForecastError {
    /// True for failures the caller may want to retry: transport errors and
    /// non-2xx statuses.
    pub fn is_network(&self) -> bool {
        matches!(self, ForecastError::Network(_) | ForecastError::Status { .. })
    }

    pub(crate) fn missing(field: &str) -> Self {
        ForecastError::MalformedResponse(format!("missing `{field}`"))
    }
}
