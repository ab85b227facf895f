//! Static GTFS stop-list loader.

use serde::Deserialize;
use thiserror::Error;

use crate::models::TransitStop;

#[derive(Debug, Error)]
pub enum StopsError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Network error: {0}")]
    NetworkMessage(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// One row of stops.txt; columns we do not use are ignored.
#[derive(Debug, Deserialize)]
struct StopRow {
    stop_id: String,
    #[serde(default)]
    stop_code: String,
    stop_name: String,
    #[serde(default)]
    parent_station: String,
}

/// Fetches and parses the static stop list.
pub async fn fetch_stops(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<TransitStop>, StopsError> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(StopsError::NetworkMessage(format!(
            "stops.txt HTTP {}",
            response.status()
        )));
    }

    let bytes = response.bytes().await?;
    parse_stops(bytes.as_ref())
}

/// Parses stops.txt CSV content.
pub fn parse_stops(data: &[u8]) -> Result<Vec<TransitStop>, StopsError> {
    let mut reader = csv::Reader::from_reader(data);
    let mut stops = Vec::new();
    for row in reader.deserialize::<StopRow>() {
        let row = row?;
        stops.push(TransitStop {
            stop_id: row.stop_id,
            stop_code: row.stop_code,
            name: row.stop_name,
            parent_station: if row.parent_station.is_empty() {
                None
            } else {
                Some(row.parent_station)
            },
        });
    }
    Ok(stops)
}
