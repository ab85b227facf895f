//! Route grouping and ranking for the departure board.
//!
//! Groups live in a Vec with a side lookup index, so first-seen order is
//! explicit and ties never depend on map iteration order.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::board::windowing::{classify, minutes_until, Eligibility, NextServiceTracker};
use crate::models::Departure;

/// Departures sharing a (route, destination) key at one origin stop.
#[derive(Debug, Clone)]
pub struct RouteGroup {
    pub route: String,
    pub headsign: String,
    pub stop_id: String,
    minutes: Vec<i64>,
}

impl RouteGroup {
    /// Minutes until each departure in the group, ascending.
    pub fn minutes(&self) -> &[i64] {
        &self.minutes
    }

    /// Soonest departure in the group; the ranking key.
    pub fn soonest(&self) -> i64 {
        self.minutes.first().copied().unwrap_or(i64::MAX)
    }
}

/// Strips the noise token "Station" and collapses whitespace.
pub fn normalize_headsign(raw: &str) -> String {
    raw.split_whitespace()
        .filter(|word| !word.eq_ignore_ascii_case("station"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Groups one stop's departures by (route, normalized headsign), ranks by
/// soonest departure and keeps the top `max_groups`.
///
/// Departures outside the window feed `tracker` instead of a group.
pub fn group_stop_departures(
    departures: &[Departure],
    now: DateTime<Utc>,
    window_minutes: i64,
    max_groups: usize,
    tracker: &mut NextServiceTracker,
) -> Vec<RouteGroup> {
    let mut groups: Vec<RouteGroup> = Vec::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for departure in departures {
        let minutes = minutes_until(departure.departure, now);
        if classify(minutes, window_minutes) != Eligibility::Within {
            tracker.observe(departure.departure);
            continue;
        }
        let headsign = normalize_headsign(&departure.headsign);
        let key = (departure.route.clone(), headsign.clone());
        match index.get(&key) {
            Some(&at) => groups[at].minutes.push(minutes),
            None => {
                index.insert(key, groups.len());
                groups.push(RouteGroup {
                    route: departure.route.clone(),
                    headsign,
                    stop_id: departure.stop_id.clone(),
                    minutes: vec![minutes],
                });
            }
        }
    }

    for group in &mut groups {
        group.minutes.sort_unstable();
    }
    // Stable sort: equal soonest times keep first-encountered order.
    groups.sort_by_key(|group| group.soonest());
    groups.truncate(max_groups);
    groups
}

/// Merges per-stop rankings into the final display order.
///
/// No cap at this stage; every surviving group re-sorts by soonest
/// departure regardless of which stop it came from.
pub fn rank_across_stops(mut groups: Vec<RouteGroup>) -> Vec<RouteGroup> {
    groups.sort_by_key(|group| group.soonest());
    groups
}
