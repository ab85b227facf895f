//! Shared domain records parsed from the upstream providers.
//!
//! The provider clients produce these; the board pipelines consume them.
//! None of them outlive a request.

use chrono::{DateTime, Utc};

/// A displayable departure parsed from one upstream arrival record.
#[derive(Debug, Clone)]
pub struct Departure {
    /// Origin stop this arrival was fetched for.
    pub stop_id: String,
    /// Short rider-facing route code (e.g. "7", "301").
    pub route: String,
    /// Rider-facing destination label; may contain noise like "Station".
    pub headsign: String,
    /// Scheduled departure, falling back to the scheduled arrival when the
    /// upstream record has none (e.g. end of trip).
    pub departure: DateTime<Utc>,
}

/// A service alert decoded from the GTFS-realtime feed.
#[derive(Debug, Clone, Default)]
pub struct ServiceAlert {
    pub id: String,
    pub header: String,
    /// May contain markup and upstream formatting defects.
    pub description: String,
    /// Affected routes; empty together with `stop_ids` means system-wide.
    pub route_ids: Vec<String>,
    pub stop_ids: Vec<String>,
}

impl ServiceAlert {
    /// System-wide alerts declare no specific stops or routes.
    pub fn is_system_wide(&self) -> bool {
        self.route_ids.is_empty() && self.stop_ids.is_empty()
    }
}

/// A stop record from the static GTFS stop list.
#[derive(Debug, Clone)]
pub struct TransitStop {
    pub stop_id: String,
    /// Rider-facing stop code printed on the pole.
    pub stop_code: String,
    pub name: String,
    /// Set when this record is a child of a parent station.
    pub parent_station: Option<String>,
}

/// A trip from the GO next-service endpoint.
#[derive(Debug, Clone)]
pub struct GoTrip {
    pub line_code: String,
    pub service_name: String,
    /// Upstream service class code; "T" marks rail.
    pub service_type: String,
    /// Local wall-clock timestamp string "YYYY-MM-DD HH:MM:SS", no offset.
    pub scheduled_time: String,
    pub platform: Option<String>,
    /// Stop names along the trip, in travel order.
    pub stops: Vec<String>,
}
