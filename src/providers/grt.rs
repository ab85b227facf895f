//! Client for the regional transit GraphQL API.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::config::GrtConfig;
use crate::models::Departure;

#[derive(Debug, Error)]
pub enum GrtError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

/// GraphQL client for per-stop arrival data.
pub struct GrtClient {
    client: Client,
    graphql_url: String,
    arrivals_per_stop: u32,
}

impl GrtClient {
    pub fn new(cfg: &GrtConfig) -> Result<Self, GrtError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| GrtError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            graphql_url: cfg.graphql_url.clone(),
            arrivals_per_stop: cfg.arrivals_per_stop,
        })
    }

    /// Builds the aliased arrivals query for a set of stops.
    ///
    /// Stop ids are interpolated as quoted string literals; the alias keys
    /// (`s0`, `s1`, ...) keep the response map unambiguous when several
    /// stops are requested at once.
    fn build_query(&self, stop_ids: &[String]) -> String {
        let mut query = String::from("{ ");
        for (i, id) in stop_ids.iter().enumerate() {
            let _ = write!(
                query,
                "s{}: stop(id: \"{}\") {{ stopId arrivals(limit: {}) {{ route headsign scheduledArrival scheduledDeparture }} }} ",
                i,
                escape_literal(id),
                self.arrivals_per_stop
            );
        }
        query.push('}');
        query
    }

    /// Fetches arrivals for the given stops, flattened into departure
    /// records. Records with unparsable timestamps are skipped.
    pub async fn fetch_arrivals(&self, stop_ids: &[String]) -> Result<Vec<Departure>, GrtError> {
        let query = self.build_query(stop_ids);
        let response = self
            .client
            .post(&self.graphql_url)
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await
            .map_err(|e| GrtError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GrtError::Api(format!("HTTP error: {}", response.status())));
        }

        let body: GraphQlResponse = response
            .json()
            .await
            .map_err(|e| GrtError::Parse(e.to_string()))?;

        if let Some(first) = body.errors.as_ref().and_then(|errors| errors.first()) {
            return Err(GrtError::Api(first.message.clone()));
        }

        let data = body
            .data
            .ok_or_else(|| GrtError::Parse("response has no data".to_string()))?;

        let mut departures = Vec::new();
        for payload in data.into_values().flatten() {
            for arrival in payload.arrivals {
                // Departure time is primary; the arrival time stands in
                // when the record has none (e.g. end of trip).
                let raw_time = arrival
                    .scheduled_departure
                    .as_deref()
                    .or(arrival.scheduled_arrival.as_deref());
                let Some(departure_at) = raw_time.and_then(parse_time) else {
                    warn!(
                        stop = %payload.stop_id,
                        raw = raw_time.unwrap_or(""),
                        "Skipping arrival with unparsable time"
                    );
                    continue;
                };
                departures.push(Departure {
                    stop_id: payload.stop_id.clone(),
                    route: arrival.route,
                    headsign: arrival.headsign,
                    departure: departure_at,
                });
            }
        }
        Ok(departures)
    }
}

fn parse_time(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn escape_literal(id: &str) -> String {
    id.replace('\\', "\\\\").replace('"', "\\\"")
}

// Response structures

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<HashMap<String, Option<StopPayload>>>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StopPayload {
    stop_id: String,
    #[serde(default)]
    arrivals: Vec<RawArrival>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArrival {
    route: String,
    headsign: String,
    scheduled_arrival: Option<String>,
    scheduled_departure: Option<String>,
}
