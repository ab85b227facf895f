//! GTFS-realtime alert feed fetch and decode.

use prost::Message;
use thiserror::Error;
use tracing::warn;

use crate::models::ServiceAlert;

/// Maximum allowed protobuf response size (10 MB).
const MAX_PROTOBUF_SIZE: usize = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Network error: {0}")]
    NetworkMessage(String),
}

/// Fetches and decodes the alert feed.
///
/// Transport failures are errors; a payload that fails to decode yields an
/// empty set instead, so a broken feed never blocks departure display.
pub async fn fetch_alerts(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<ServiceAlert>, FeedError> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(FeedError::NetworkMessage(format!(
            "alert feed HTTP {}",
            response.status()
        )));
    }

    let bytes = response.bytes().await?;

    if bytes.len() > MAX_PROTOBUF_SIZE {
        return Err(FeedError::NetworkMessage(format!(
            "alert feed too large: {} bytes (max {} bytes)",
            bytes.len(),
            MAX_PROTOBUF_SIZE
        )));
    }

    match gtfs_realtime::FeedMessage::decode(bytes.as_ref()) {
        Ok(feed) => Ok(extract_alerts(&feed)),
        Err(e) => {
            warn!(error = %e, "Alert feed failed to decode; treating as no alerts");
            Ok(Vec::new())
        }
    }
}

/// Maps feed entities onto alert records.
///
/// Informed entities contribute their route and stop ids; an alert with
/// neither is system-wide.
pub fn extract_alerts(feed: &gtfs_realtime::FeedMessage) -> Vec<ServiceAlert> {
    feed.entity
        .iter()
        .filter_map(|entity| {
            let alert = entity.alert.as_ref()?;

            let mut route_ids = Vec::new();
            let mut stop_ids = Vec::new();
            for informed in &alert.informed_entity {
                if let Some(route_id) = informed.route_id.as_deref() {
                    if !route_id.is_empty() {
                        route_ids.push(route_id.to_string());
                    }
                }
                if let Some(stop_id) = informed.stop_id.as_deref() {
                    if !stop_id.is_empty() {
                        stop_ids.push(stop_id.to_string());
                    }
                }
            }

            Some(ServiceAlert {
                id: entity.id.clone(),
                header: first_translation(alert.header_text.as_ref()),
                description: first_translation(alert.description_text.as_ref()),
                route_ids,
                stop_ids,
            })
        })
        .collect()
}

fn first_translation(text: Option<&gtfs_realtime::TranslatedString>) -> String {
    text.and_then(|translated| translated.translation.first())
        .map(|translation| translation.text.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gtfs_realtime::translated_string::Translation;
    use gtfs_realtime::{Alert, EntitySelector, FeedEntity, FeedMessage, TranslatedString};

    fn translated(text: &str) -> Option<TranslatedString> {
        Some(TranslatedString {
            translation: vec![Translation {
                text: text.to_string(),
                ..Default::default()
            }],
        })
    }

    fn alert_entity(id: &str, header: &str, routes: &[&str], stops: &[&str]) -> FeedEntity {
        let informed_entity = routes
            .iter()
            .map(|route| EntitySelector {
                route_id: Some(route.to_string()),
                ..Default::default()
            })
            .chain(stops.iter().map(|stop| EntitySelector {
                stop_id: Some(stop.to_string()),
                ..Default::default()
            }))
            .collect();

        FeedEntity {
            id: id.to_string(),
            alert: Some(Alert {
                informed_entity,
                header_text: translated(header),
                description_text: translated("details follow"),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn feed(entities: Vec<FeedEntity>) -> FeedMessage {
        FeedMessage {
            header: gtfs_realtime::FeedHeader {
                gtfs_realtime_version: "2.0".to_string(),
                ..Default::default()
            },
            entity: entities,
        }
    }

    #[test]
    fn test_extract_alerts_reads_scope_and_text() {
        let message = feed(vec![
            alert_entity("a1", "Route 7 detour", &["7"], &[]),
            alert_entity("a2", "Elevator out", &[], &["1123"]),
            alert_entity("a3", "System notice", &[], &[]),
        ]);

        let alerts = extract_alerts(&message);
        assert_eq!(alerts.len(), 3);
        assert_eq!(alerts[0].header, "Route 7 detour");
        assert_eq!(alerts[0].route_ids, vec!["7"]);
        assert!(alerts[0].stop_ids.is_empty());
        assert_eq!(alerts[1].stop_ids, vec!["1123"]);
        assert!(alerts[2].is_system_wide());
    }

    #[test]
    fn test_entities_without_alert_payload_are_ignored() {
        let message = feed(vec![FeedEntity {
            id: "vehicle-only".to_string(),
            ..Default::default()
        }]);
        assert!(extract_alerts(&message).is_empty());
    }

    #[test]
    fn test_missing_translations_become_empty_strings() {
        let message = feed(vec![FeedEntity {
            id: "bare".to_string(),
            alert: Some(Alert::default()),
            ..Default::default()
        }]);
        let alerts = extract_alerts(&message);
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].header.is_empty());
        assert!(alerts[0].description.is_empty());
    }
}
