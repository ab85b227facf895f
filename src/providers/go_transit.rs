//! Client for the GO Transit next-service REST API.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::config::GoConfig;
use crate::models::GoTrip;

#[derive(Debug, Error)]
pub enum GoError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Signed REST client for the rail next-service endpoint.
pub struct GoClient {
    client: Client,
    api_url: String,
    station_code: String,
    api_key: Option<String>,
}

impl GoClient {
    pub fn new(cfg: &GoConfig) -> Result<Self, GoError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| GoError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: cfg.api_url.clone(),
            station_code: cfg.station_code.clone(),
            api_key: cfg.api_key.clone(),
        })
    }

    /// Whether a pre-shared key is configured. Without one the caller
    /// renders a diagnostic frame instead of calling out.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fetches the raw next-service trips for the configured station.
    pub async fn fetch_next_services(&self) -> Result<Vec<GoTrip>, GoError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| GoError::Api("API key not configured".to_string()))?;

        let url = format!(
            "{}/api/V1/Stop/NextService/{}?key={}",
            self.api_url,
            self.station_code,
            urlencoding::encode(key)
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| GoError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GoError::Api(format!("HTTP error: {}", response.status())));
        }

        let body: NextServiceResponse = response
            .json()
            .await
            .map_err(|e| GoError::Parse(e.to_string()))?;

        let lines = body
            .next_service
            .map(|service| service.lines)
            .unwrap_or_default();
        Ok(lines.into_iter().map(RawLine::into_trip).collect())
    }
}

// Response structures (the upstream payload is PascalCase)

#[derive(Debug, Deserialize)]
struct NextServiceResponse {
    #[serde(rename = "NextService")]
    next_service: Option<NextService>,
}

#[derive(Debug, Deserialize)]
struct NextService {
    #[serde(default, rename = "Lines")]
    lines: Vec<RawLine>,
}

#[derive(Debug, Deserialize)]
struct RawLine {
    #[serde(rename = "LineCode")]
    line_code: String,
    #[serde(rename = "LineName")]
    line_name: String,
    #[serde(rename = "ServiceType")]
    service_type: String,
    #[serde(rename = "ScheduledDepartureTime")]
    scheduled_departure_time: String,
    #[serde(default, rename = "ActualPlatform")]
    actual_platform: Option<String>,
    #[serde(default, rename = "Stops")]
    stops: Vec<RawStop>,
}

#[derive(Debug, Deserialize)]
struct RawStop {
    #[serde(rename = "Name")]
    name: String,
}

impl RawLine {
    fn into_trip(self) -> GoTrip {
        GoTrip {
            line_code: self.line_code,
            service_name: self.line_name,
            service_type: self.service_type,
            scheduled_time: self.scheduled_departure_time,
            platform: self.actual_platform,
            stops: self.stops.into_iter().map(|stop| stop.name).collect(),
        }
    }
}
