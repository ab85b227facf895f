//! Alert relevance filtering and device rendering.

use std::collections::HashSet;

use crate::display::{icons, Frame};
use crate::models::ServiceAlert;

/// Selects the alerts in scope for a set of stops and the routes serving
/// them.
///
/// System-wide alerts always match. With neither stops nor routes given,
/// everything matches.
pub fn relevant_alerts<'a>(
    alerts: &'a [ServiceAlert],
    stops: Option<&HashSet<String>>,
    routes: Option<&HashSet<String>>,
) -> Vec<&'a ServiceAlert> {
    if stops.is_none() && routes.is_none() {
        return alerts.iter().collect();
    }
    alerts
        .iter()
        .filter(|alert| {
            if alert.is_system_wide() {
                return true;
            }
            if let Some(stops) = stops {
                if alert.stop_ids.iter().any(|id| stops.contains(id)) {
                    return true;
                }
            }
            if let Some(routes) = routes {
                if alert.route_ids.iter().any(|id| routes.contains(id)) {
                    return true;
                }
            }
            false
        })
        .collect()
}

/// Renders each alert as one frame; the header stands in when the cleaned
/// description is empty.
pub fn render_alerts(alerts: &[&ServiceAlert], text_limit: usize) -> Vec<Frame> {
    alerts
        .iter()
        .filter_map(|alert| {
            let cleaned = clean_description(&alert.description);
            let text = if cleaned.is_empty() {
                alert.header.trim().to_string()
            } else {
                cleaned
            };
            if text.is_empty() {
                return None;
            }
            Some(Frame::with_icon(truncate(&text, text_limit), icons::ALERT))
        })
        .collect()
}

/// Cleans upstream alert markup and the duplicated-lead-phrase defect.
pub fn clean_description(raw: &str) -> String {
    let stripped = strip_markup(raw);
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    strip_duplicated_lead(&collapsed)
}

/// Removes `<...>` markup tags, leaving a space so words stay separated.
fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Drops a leading phrase of 1-3 words that repeats immediately.
///
/// The feed emits some descriptions with the header pasted in twice, e.g.
/// "Stop closure Stop closure due to construction".
fn strip_duplicated_lead(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    for n in (1..=3).rev() {
        if words.len() < 2 * n {
            continue;
        }
        let repeats = (0..n).all(|i| words[i].eq_ignore_ascii_case(words[n + i]));
        if repeats {
            return words[2 * n..].join(" ");
        }
    }
    text.to_string()
}

/// Truncates to `limit` chars total, marking truncation with "...".
pub fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let keep = limit.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}
