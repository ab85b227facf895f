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
use crate::board::go::{filter_go_trips, render_go_trips};
use crate::display::{icons, Frame, FrameResponse};

#[derive(Debug, Deserialize, IntoParams)]
pub struct GoDeparturesQuery {
    /// Optional comma-delimited line codes (e.g. "LW,KI").
    pub lines: Option<String>,
}

/// GO rail departure frames
#[utoipa::path(
    get,
    path = "/go-departures",
    params(GoDeparturesQuery),
    responses(
        (status = 200, description = "Rail display frames, or a diagnostic frame", body = FrameResponse),
        (status = 500, description = "Upstream failure", body = FrameResponse)
    ),
    tag = "go"
)]
pub async fn get_go_departures(
    State(ctx): State<AppContext>,
    Query(query): Query<GoDeparturesQuery>,
) -> (StatusCode, Json<FrameResponse>) {
    // The device cannot act on an HTTP error code, so a missing key is a
    // readable frame rather than an error status.
    if !ctx.go.has_api_key() {
        warn!("GO departures requested but no API key is configured");
        return (
            StatusCode::OK,
            Json(FrameResponse::single(Frame::with_icon(
                "No GO key",
                icons::ALERT,
            ))),
        );
    }

    let trips = match ctx.go.fetch_next_services().await {
        Ok(trips) => trips,
        Err(e) => {
            error!(error = %e, "GO fetch failed");
            let short: String = e.to_string().chars().take(12).collect();
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(FrameResponse::single(Frame::with_icon(short, icons::ALERT))),
            );
        }
    };

    if trips.is_empty() {
        return (
            StatusCode::OK,
            Json(FrameResponse::single(Frame::with_icon(
                "No trips",
                icons::ALERT,
            ))),
        );
    }

    let line_codes = parse_lines_param(query.lines);
    let filtered = filter_go_trips(
        &trips,
        chrono::Utc::now(),
        line_codes.as_deref(),
        &ctx.config.go,
        ctx.tz,
    );
    let frames = render_go_trips(&filtered, &ctx.config.go);

    (StatusCode::OK, Json(FrameResponse::new(frames)))
}

/// Splits the comma-delimited lines parameter; None when absent or empty.
fn parse_lines_param(raw: Option<String>) -> Option<Vec<String>> {
    let raw = raw?;
    let codes: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(|code| code.to_ascii_uppercase())
        .collect();
    if codes.is_empty() {
        None
    } else {
        Some(codes)
    }
}

pub fn router(ctx: AppContext) -> Router {
    Router::new()
        .route("/", get(get_go_departures))
        .with_state(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lines_param_uppercases_codes() {
        let parsed = parse_lines_param(Some("lw, ki".to_string())).unwrap();
        assert_eq!(parsed, vec!["LW", "KI"]);
    }

    #[test]
    fn test_parse_lines_param_rejects_empty() {
        assert!(parse_lines_param(None).is_none());
        assert!(parse_lines_param(Some(" , ".to_string())).is_none());
    }
}
