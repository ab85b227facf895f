//! Time-window classification for upstream departures.

use chrono::{DateTime, Utc};

/// Whole minutes from `now` until `departure`, rounded half-away-from-zero.
pub fn minutes_until(departure: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let seconds = (departure - now).num_seconds();
    (seconds as f64 / 60.0).round() as i64
}

/// Where a departure falls relative to the display window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    /// Already departed.
    Past,
    /// Displayable: within `[0, window]` minutes, boundaries inclusive.
    Within,
    /// Further out than the window.
    Beyond,
}

pub fn classify(minutes: i64, window_minutes: i64) -> Eligibility {
    if minutes < 0 {
        Eligibility::Past
    } else if minutes <= window_minutes {
        Eligibility::Within
    } else {
        Eligibility::Beyond
    }
}

/// Accumulates the earliest departure that missed the display window.
///
/// Consulted only when windowing leaves nothing to show, to render the
/// "closed, next service at HH:MM" fallback. Every non-eligible departure
/// feeds it, past ones included.
#[derive(Debug, Default)]
pub struct NextServiceTracker {
    earliest: Option<DateTime<Utc>>,
}

impl NextServiceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, departure: DateTime<Utc>) {
        match self.earliest {
            Some(current) if current <= departure => {}
            _ => self.earliest = Some(departure),
        }
    }

    pub fn next_service(&self) -> Option<DateTime<Utc>> {
        self.earliest
    }
}
