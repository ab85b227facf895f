use std::collections::HashSet;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::{error, warn};
use utoipa::IntoParams;

use crate::api::AppContext;
use crate::board::grouping::{group_stop_departures, rank_across_stops};
use crate::board::render::render_board;
use crate::board::windowing::NextServiceTracker;
use crate::board::alerts as alert_board;
use crate::display::{icons, Frame, FrameResponse};
use crate::providers::alert_feed;

#[derive(Debug, Deserialize, IntoParams)]
pub struct DeparturesQuery {
    /// Comma-delimited stop ids.
    pub stop: Option<String>,
    /// Legacy alias for `stop`.
    pub stops: Option<String>,
}

/// Departure board frames for one or more stops
#[utoipa::path(
    get,
    path = "/departures",
    params(DeparturesQuery),
    responses(
        (status = 200, description = "Ordered display frames", body = FrameResponse),
        (status = 400, description = "Missing stop parameter", body = FrameResponse),
        (status = 500, description = "Upstream failure", body = FrameResponse)
    ),
    tag = "departures"
)]
pub async fn get_departures(
    State(ctx): State<AppContext>,
    Query(query): Query<DeparturesQuery>,
) -> (StatusCode, Json<FrameResponse>) {
    let stop_ids = match parse_stop_param(query.stop.or(query.stops)) {
        Some(ids) => ids,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(FrameResponse::single(Frame::with_icon(
                    "Missing stop param",
                    icons::ALERT,
                ))),
            );
        }
    };

    let departures = match ctx.grt.fetch_arrivals(&stop_ids).await {
        Ok(departures) => departures,
        Err(e) => {
            error!(error = %e, "Departure fetch failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(FrameResponse::single(Frame::with_icon(
                    "Error",
                    icons::ALERT,
                ))),
            );
        }
    };

    let now = chrono::Utc::now();
    let display = &ctx.config.display;
    let window = ctx.config.grt.window_minutes;

    // Per-stop top-N runs independently per stop; the tracker spans all of
    // them so the fallback frame can name the next service anywhere.
    let mut tracker = NextServiceTracker::new();
    let mut groups = Vec::new();
    for stop_id in &stop_ids {
        let stop_departures: Vec<_> = departures
            .iter()
            .filter(|departure| &departure.stop_id == stop_id)
            .cloned()
            .collect();
        groups.extend(group_stop_departures(
            &stop_departures,
            now,
            window,
            display.max_groups_per_stop,
            &mut tracker,
        ));
    }
    let ranked = rank_across_stops(groups);
    let mut frames = render_board(&ranked, tracker.next_service(), display, ctx.tz);

    if ctx.config.grt.include_alerts {
        // The route scope comes from the fetched departures, which is why
        // the alert fetch happens after the departure fetch.
        match alert_feed::fetch_alerts(&ctx.http, &ctx.config.grt.alerts_url).await {
            Ok(all_alerts) => {
                let stops: HashSet<String> = stop_ids.iter().cloned().collect();
                let routes: HashSet<String> = departures
                    .iter()
                    .map(|departure| departure.route.clone())
                    .collect();
                let selected =
                    alert_board::relevant_alerts(&all_alerts, Some(&stops), Some(&routes));
                frames.extend(alert_board::render_alerts(&selected, display.alert_text_limit));
            }
            Err(e) => {
                warn!(error = %e, "Alert fetch failed; departures render without alerts");
            }
        }
    }

    (StatusCode::OK, Json(FrameResponse::new(frames)))
}

/// Splits the comma-delimited stop parameter; None when absent or empty.
fn parse_stop_param(raw: Option<String>) -> Option<Vec<String>> {
    let raw = raw?;
    let ids: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect();
    if ids.is_empty() {
        None
    } else {
        Some(ids)
    }
}

pub fn router(ctx: AppContext) -> Router {
    Router::new()
        .route("/", get(get_departures))
        .with_state(ctx)
}
