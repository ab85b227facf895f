//! Converts ranked route groups into device frames.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::board::grouping::RouteGroup;
use crate::config::DisplayConfig;
use crate::display::{icons, Frame, GoalData};

/// Renders the full ranked board, falling back to the closed frames when
/// nothing survived windowing.
pub fn render_board(
    groups: &[RouteGroup],
    next_service: Option<DateTime<Utc>>,
    cfg: &DisplayConfig,
    tz: Tz,
) -> Vec<Frame> {
    if groups.is_empty() {
        return render_closed(next_service, tz);
    }
    groups
        .iter()
        .flat_map(|group| render_group(group, cfg))
        .collect()
}

/// Renders one ranked group into its frame sequence.
pub fn render_group(group: &RouteGroup, cfg: &DisplayConfig) -> Vec<Frame> {
    let mut frames = Vec::with_capacity(3);
    if cfg.rail_routes.iter().any(|route| route == &group.route) {
        // Light-rail gets a single combined frame with the ION bitmap.
        frames.push(Frame::with_icon(group.headsign.clone(), icons::ION));
    } else {
        frames.push(Frame::with_icon(group.route.clone(), icons::BUS));
        frames.push(Frame::text(group.headsign.clone()));
    }

    let (text, due) = format_times(group.minutes(), cfg);
    let mut times = Frame::text(text);
    if due {
        times.goal_data = Some(GoalData::due());
    }
    frames.push(times);
    frames
}

/// Formats the up-to-N soonest times, e.g. "3, 10m" or "Due, 10m".
///
/// Returns the text plus whether the soonest time is at or below the due
/// threshold.
pub fn format_times(minutes: &[i64], cfg: &DisplayConfig) -> (String, bool) {
    let shown = &minutes[..minutes.len().min(cfg.times_per_frame)];
    let mut parts: Vec<String> = Vec::with_capacity(shown.len());
    let mut last_is_numeric = false;
    for &value in shown {
        if value <= cfg.due_threshold_minutes {
            parts.push(cfg.due_label.clone());
            last_is_numeric = false;
        } else {
            parts.push(value.to_string());
            last_is_numeric = true;
        }
    }
    let mut text = parts.join(", ");
    if last_is_numeric {
        text.push('m');
    }
    let due = shown
        .first()
        .is_some_and(|&value| value <= cfg.due_threshold_minutes);
    (text, due)
}

/// The empty-board fallback: "CLOSED", plus the next service time if known.
pub fn render_closed(next_service: Option<DateTime<Utc>>, tz: Tz) -> Vec<Frame> {
    let mut frames = vec![Frame::with_icon("CLOSED", icons::CLOSED)];
    if let Some(next) = next_service {
        let local = next.with_timezone(&tz);
        frames.push(Frame::with_icon(
            format!("→ {}", local.format("%H:%M")),
            icons::CLOCK,
        ));
    }
    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::grouping::{group_stop_departures, rank_across_stops};
    use crate::board::windowing::NextServiceTracker;
    use crate::models::Departure;
    use chrono::Duration;
    use chrono_tz::America::Toronto;

    fn cfg() -> DisplayConfig {
        DisplayConfig::default()
    }

    fn base_time() -> DateTime<Utc> {
        chrono::DateTime::parse_from_rfc3339("2026-02-02T17:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn departure(stop: &str, route: &str, headsign: &str, minutes: i64) -> Departure {
        Departure {
            stop_id: stop.to_string(),
            route: route.to_string(),
            headsign: headsign.to_string(),
            departure: base_time() + Duration::minutes(minutes),
        }
    }

    fn groups_for(departures: &[Departure]) -> Vec<RouteGroup> {
        let mut tracker = NextServiceTracker::new();
        group_stop_departures(departures, base_time(), 120, 3, &mut tracker)
    }

    #[test]
    fn test_bus_group_renders_route_headsign_and_times() {
        let groups = groups_for(&[
            departure("1123", "7", "Downtown Station", 3),
            departure("1123", "7", "Downtown Station", 10),
        ]);
        let frames = render_group(&groups[0], &cfg());

        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].text, "7");
        assert_eq!(frames[0].icon.as_deref(), Some(icons::BUS));
        assert_eq!(frames[1].text, "Downtown");
        assert!(frames[1].icon.is_none());
        assert_eq!(frames[2].text, "3, 10m");
        assert!(frames[2].goal_data.is_none());
    }

    #[test]
    fn test_rail_group_renders_single_frame_with_ion_bitmap() {
        let groups = groups_for(&[departure("1123", "301", "Conestoga Station", 12)]);
        let frames = render_group(&groups[0], &cfg());

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].text, "Conestoga");
        assert_eq!(frames[0].icon.as_deref(), Some(icons::ION));
        assert_eq!(frames[1].text, "12m");
    }

    #[test]
    fn test_due_time_renders_label_and_goal_cue() {
        let groups = groups_for(&[
            departure("B", "8", "Mall", 1),
            departure("B", "8", "Mall", 10),
        ]);
        let frames = render_group(&groups[0], &cfg());

        let times = frames.last().unwrap();
        assert_eq!(times.text, "Due, 10m");
        assert_eq!(times.goal_data, Some(GoalData::due()));
    }

    #[test]
    fn test_only_two_times_shown_per_group() {
        let groups = groups_for(&[
            departure("1123", "7", "Downtown", 5),
            departure("1123", "7", "Downtown", 15),
            departure("1123", "7", "Downtown", 25),
        ]);
        let frames = render_group(&groups[0], &cfg());
        assert_eq!(frames.last().unwrap().text, "5, 15m");
    }

    #[test]
    fn test_two_stop_scenario_orders_due_group_first() {
        let mut tracker = NextServiceTracker::new();
        let mut groups = group_stop_departures(
            &[
                departure("A", "7", "Downtown Station", 3),
                departure("A", "7", "Downtown Station", 10),
            ],
            base_time(),
            120,
            3,
            &mut tracker,
        );
        groups.extend(group_stop_departures(
            &[departure("B", "8", "Mall", 1)],
            base_time(),
            120,
            3,
            &mut tracker,
        ));
        let ranked = rank_across_stops(groups);
        let frames = render_board(&ranked, tracker.next_service(), &cfg(), Toronto);

        assert_eq!(frames[0].text, "8");
        assert_eq!(frames[1].text, "Mall");
        assert_eq!(frames[2].text, "Due");
        assert_eq!(frames[2].goal_data, Some(GoalData::due()));
        assert_eq!(frames[3].text, "7");
        assert_eq!(frames[4].text, "Downtown");
        assert_eq!(frames[5].text, "3, 10m");
        assert!(frames.iter().all(|f| !f.text.is_empty()));
    }

    #[test]
    fn test_empty_board_renders_closed_with_next_service() {
        // Nothing eligible, one departure 150 minutes out. 17:00 UTC is
        // 12:00 in Toronto (EST), so 150 minutes later reads 14:30.
        let departures = [departure("1123", "7", "Downtown", 150)];
        let mut tracker = NextServiceTracker::new();
        let groups = group_stop_departures(&departures, base_time(), 120, 3, &mut tracker);
        let frames = render_board(&groups, tracker.next_service(), &cfg(), Toronto);

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].text, "CLOSED");
        assert_eq!(frames[0].icon.as_deref(), Some(icons::CLOSED));
        assert_eq!(frames[1].text, "→ 14:30");
        assert_eq!(frames[1].icon.as_deref(), Some(icons::CLOCK));
    }

    #[test]
    fn test_closed_without_tracked_time_is_single_frame() {
        let frames = render_board(&[], None, &cfg(), Toronto);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].text, "CLOSED");
    }

    #[test]
    fn test_next_service_time_is_zero_padded() {
        // 13:05 UTC is 08:05 in Toronto (EST).
        let next = chrono::DateTime::parse_from_rfc3339("2026-02-02T13:05:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let frames = render_closed(Some(next), Toronto);
        assert_eq!(frames[1].text, "→ 08:05");
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let groups = groups_for(&[
            departure("1123", "7", "Downtown", 3),
            departure("1123", "8", "Mall", 1),
        ]);
        let first = render_board(&groups, None, &cfg(), Toronto);
        let second = render_board(&groups, None, &cfg(), Toronto);
        assert_eq!(first, second);
    }
}
