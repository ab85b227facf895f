use std::collections::HashSet;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::error;
use utoipa::IntoParams;

use crate::api::AppContext;
use crate::board::alerts::{relevant_alerts, render_alerts};
use crate::display::{icons, Frame, FrameResponse};
use crate::providers::alert_feed;

#[derive(Debug, Deserialize, IntoParams)]
pub struct AlertsQuery {
    /// Optional stop id to scope the alerts to.
    pub stop: Option<String>,
}

/// Service alert frames
#[utoipa::path(
    get,
    path = "/alerts",
    params(AlertsQuery),
    responses(
        (status = 200, description = "Alert display frames", body = FrameResponse),
        (status = 500, description = "Upstream failure", body = FrameResponse)
    ),
    tag = "alerts"
)]
pub async fn get_alerts(
    State(ctx): State<AppContext>,
    Query(query): Query<AlertsQuery>,
) -> (StatusCode, Json<FrameResponse>) {
    let all_alerts = match alert_feed::fetch_alerts(&ctx.http, &ctx.config.grt.alerts_url).await {
        Ok(alerts) => alerts,
        Err(e) => {
            error!(error = %e, "Alert fetch failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(FrameResponse::single(Frame::with_icon(
                    "Error",
                    icons::ALERT,
                ))),
            );
        }
    };

    let stops: Option<HashSet<String>> = query
        .stop
        .filter(|stop| !stop.trim().is_empty())
        .map(|stop| HashSet::from([stop.trim().to_string()]));

    let selected = relevant_alerts(&all_alerts, stops.as_ref(), None);
    let mut frames = render_alerts(&selected, ctx.config.display.alert_text_limit);
    if frames.is_empty() {
        frames.push(Frame::with_icon("No alerts", icons::CHECK));
    }

    (StatusCode::OK, Json(FrameResponse::new(frames)))
}

pub fn router(ctx: AppContext) -> Router {
    Router::new().route("/", get(get_alerts)).with_state(ctx)
}
