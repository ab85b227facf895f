//! The GO rail pipeline: filter, dedupe and render next-service trips.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::config::GoConfig;
use crate::display::{icons, Frame, GoalData};
use crate::models::GoTrip;

/// Service class code marking rail trips in the upstream payload.
const RAIL_SERVICE_TYPE: &str = "T";

/// Parses an upstream local wall-clock timestamp ("YYYY-MM-DD HH:MM:SS").
///
/// The feed carries no UTC offset; the timezone rule in effect on that
/// date decides it, so times stay correct across DST changes.
pub fn parse_go_timestamp(raw: &str, tz: Tz) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").ok()?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Filters raw trips down to the displayable rail departures.
///
/// Keeps rail-class trips inside the absolute window (computed in
/// milliseconds, boundaries inclusive), optionally narrowed to the
/// caller's lines, deduplicated to the soonest trip per service name and
/// capped at `max_trips`.
pub fn filter_go_trips(
    trips: &[GoTrip],
    now: DateTime<Utc>,
    line_codes: Option<&[String]>,
    cfg: &GoConfig,
    tz: Tz,
) -> Vec<GoTrip> {
    let window_ms = cfg.window_minutes * 60_000;
    // Unknown codes fall back to the code itself as the match term.
    let match_terms: Option<Vec<String>> = line_codes.map(|codes| {
        codes
            .iter()
            .map(|code| {
                cfg.line_names
                    .get(code)
                    .cloned()
                    .unwrap_or_else(|| code.clone())
            })
            .collect()
    });

    let mut skipped_class = 0usize;
    let mut skipped_window = 0usize;
    let mut skipped_line = 0usize;

    let mut eligible: Vec<(DateTime<Utc>, &GoTrip)> = Vec::new();
    for trip in trips {
        if trip.service_type != RAIL_SERVICE_TYPE {
            skipped_class += 1;
            continue;
        }
        let Some(at) = parse_go_timestamp(&trip.scheduled_time, tz) else {
            skipped_window += 1;
            continue;
        };
        let delta_ms = (at - now).num_milliseconds();
        if !(0..=window_ms).contains(&delta_ms) {
            skipped_window += 1;
            continue;
        }
        if let Some(terms) = &match_terms {
            // A term matches the resolved service name, or the raw line
            // code for lines missing from the lookup table.
            if !terms.iter().any(|term| {
                trip.service_name.eq_ignore_ascii_case(term)
                    || trip.line_code.eq_ignore_ascii_case(term)
            }) {
                skipped_line += 1;
                continue;
            }
        }
        eligible.push((at, trip));
    }

    eligible.sort_by_key(|(at, _)| *at);

    // One trip per service name, soonest wins.
    let mut seen: HashSet<String> = HashSet::new();
    let mut kept: Vec<GoTrip> = Vec::new();
    for (_, trip) in eligible {
        if seen.insert(trip.service_name.to_ascii_lowercase()) {
            kept.push(trip.clone());
            if kept.len() == cfg.max_trips {
                break;
            }
        }
    }

    debug!(
        total = trips.len(),
        kept = kept.len(),
        skipped_class,
        skipped_window,
        skipped_line,
        "Filtered GO trips"
    );
    kept
}

/// Renders filtered trips; an empty set becomes the "NO SVC" frame.
pub fn render_go_trips(trips: &[GoTrip], cfg: &GoConfig) -> Vec<Frame> {
    if trips.is_empty() {
        return vec![Frame::with_icon("NO SVC", icons::ALERT)];
    }

    let mut frames = Vec::new();
    for trip in trips {
        let destination = trip
            .stops
            .last()
            .cloned()
            .unwrap_or_else(|| trip.service_name.clone());
        let mut dest = Frame::text(destination);
        dest.icon = cfg.line_icons.get(&trip.service_name).cloned();
        frames.push(dest);

        // HH:MM straight out of the upstream string; recomputing it would
        // reintroduce the offset ambiguity on display.
        if let Some(hhmm) = trip.scheduled_time.get(11..16) {
            frames.push(Frame::text(hhmm));
        }

        if let Some(platform) = displayable_platform(trip.platform.as_deref()) {
            frames.push(Frame::text(format!("→ {}", platform)).goal(GoalData::platform_assigned()));
        }
    }
    frames
}

/// Normalizes a platform value; "-" and empty mean not yet assigned.
fn displayable_platform(raw: Option<&str>) -> Option<String> {
    let value = raw?.trim();
    if value.is_empty() || value == "-" {
        return None;
    }
    Some(value.replace(" & ", "/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::Toronto;

    fn go_cfg() -> GoConfig {
        GoConfig::default()
    }

    fn trip(name: &str, scheduled: &str) -> GoTrip {
        GoTrip {
            line_code: name[..2.min(name.len())].to_ascii_uppercase(),
            service_name: name.to_string(),
            service_type: "T".to_string(),
            scheduled_time: scheduled.to_string(),
            platform: None,
            stops: Vec::new(),
        }
    }

    fn now() -> DateTime<Utc> {
        // 2026-02-02 12:00 Toronto (EST, UTC-5).
        chrono::DateTime::parse_from_rfc3339("2026-02-02T17:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_timestamp_offset_follows_dst_rule() {
        // Winter: EST, UTC-5.
        let winter = parse_go_timestamp("2026-01-15 08:30:00", Toronto).unwrap();
        assert_eq!(winter.to_rfc3339(), "2026-01-15T13:30:00+00:00");

        // Summer: EDT, UTC-4.
        let summer = parse_go_timestamp("2026-07-15 08:30:00", Toronto).unwrap();
        assert_eq!(summer.to_rfc3339(), "2026-07-15T12:30:00+00:00");

        assert!(parse_go_timestamp("not a time", Toronto).is_none());
    }

    #[test]
    fn test_window_boundary_inclusive_at_180_minutes() {
        let trips = vec![
            trip("Kitchener", "2026-02-02 15:00:00"),  // exactly +180
            trip("Milton", "2026-02-02 15:01:00"),     // +181, out
            trip("Barrie", "2026-02-02 11:59:00"),     // past, out
            trip("Stouffville", "2026-02-02 12:00:00"), // exactly now
        ];
        let kept = filter_go_trips(&trips, now(), None, &go_cfg(), Toronto);
        let names: Vec<&str> = kept.iter().map(|t| t.service_name.as_str()).collect();
        assert_eq!(names, vec!["Stouffville", "Kitchener"]);
    }

    #[test]
    fn test_only_rail_class_trips_pass() {
        let mut bus = trip("Kitchener", "2026-02-02 13:00:00");
        bus.service_type = "B".to_string();
        let rail = trip("Milton", "2026-02-02 13:00:00");
        let kept = filter_go_trips(&[bus, rail], now(), None, &go_cfg(), Toronto);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].service_name, "Milton");
    }

    #[test]
    fn test_line_filter_resolves_codes_through_table() {
        let trips = vec![
            trip("Kitchener", "2026-02-02 13:00:00"),
            trip("Milton", "2026-02-02 13:05:00"),
        ];
        let codes = vec!["KI".to_string()];
        let kept = filter_go_trips(&trips, now(), Some(&codes), &go_cfg(), Toronto);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].service_name, "Kitchener");
    }

    #[test]
    fn test_unknown_line_code_matches_itself() {
        let mut odd = trip("UPX", "2026-02-02 13:00:00");
        odd.service_name = "UPX".to_string();
        let trips = vec![odd, trip("Milton", "2026-02-02 13:05:00")];
        let codes = vec!["UPX".to_string()];
        let kept = filter_go_trips(&trips, now(), Some(&codes), &go_cfg(), Toronto);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].service_name, "UPX");
    }

    #[test]
    fn test_dedupe_keeps_soonest_per_service() {
        let trips = vec![
            trip("Kitchener", "2026-02-02 14:00:00"),
            trip("Kitchener", "2026-02-02 12:30:00"),
            trip("Milton", "2026-02-02 13:00:00"),
        ];
        let kept = filter_go_trips(&trips, now(), None, &go_cfg(), Toronto);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].service_name, "Kitchener");
        assert_eq!(kept[0].scheduled_time, "2026-02-02 12:30:00");
        assert_eq!(kept[1].service_name, "Milton");
    }

    #[test]
    fn test_result_capped_at_max_trips() {
        let mut cfg = go_cfg();
        cfg.max_trips = 2;
        let trips: Vec<GoTrip> = (0..5)
            .map(|i| trip(&format!("Line {}", i), &format!("2026-02-02 12:{:02}:00", 10 + i)))
            .collect();
        let kept = filter_go_trips(&trips, now(), None, &cfg, Toronto);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_render_destination_time_and_platform() {
        let mut t = trip("Kitchener", "2026-02-02 13:05:00");
        t.stops = vec!["Guelph Central".to_string(), "Kitchener".to_string()];
        t.platform = Some("5 & 6".to_string());

        let frames = render_go_trips(&[t], &go_cfg());
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].text, "Kitchener");
        assert_eq!(frames[0].icon.as_deref(), Some("i1395"));
        assert_eq!(frames[1].text, "13:05");
        assert_eq!(frames[2].text, "→ 5/6");
        assert_eq!(frames[2].goal_data, Some(GoalData::platform_assigned()));
    }

    #[test]
    fn test_placeholder_platform_suppresses_frame() {
        for placeholder in [Some("-"), Some(""), Some("  "), None] {
            let mut t = trip("Milton", "2026-02-02 13:05:00");
            t.platform = placeholder.map(|p| p.to_string());
            let frames = render_go_trips(&[t], &go_cfg());
            assert_eq!(frames.len(), 2, "platform {:?} should render no frame", placeholder);
        }
    }

    #[test]
    fn test_destination_falls_back_to_service_name() {
        let t = trip("Barrie", "2026-02-02 13:05:00");
        let frames = render_go_trips(&[t], &go_cfg());
        assert_eq!(frames[0].text, "Barrie");
    }

    #[test]
    fn test_unknown_line_renders_without_icon() {
        let mut t = trip("UPX", "2026-02-02 13:05:00");
        t.service_name = "Union Pearson Express".to_string();
        let frames = render_go_trips(&[t], &go_cfg());
        assert!(frames[0].icon.is_none());
    }

    #[test]
    fn test_empty_pipeline_renders_no_service_frame() {
        let frames = render_go_trips(&[], &go_cfg());
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].text, "NO SVC");
        assert_eq!(frames[0].icon.as_deref(), Some(icons::ALERT));
    }
}
