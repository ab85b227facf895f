use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::api::{AppContext, ErrorResponse};
use crate::models::TransitStop;
use crate::providers::gtfs_static;

#[derive(Debug, Serialize, ToSchema)]
pub struct StopEntry {
    pub id: String,
    /// Formatted as "({code}) {name}".
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StopListResponse {
    pub data: Vec<StopEntry>,
}

/// Directory of primary stops
#[utoipa::path(
    get,
    path = "/stops",
    responses(
        (status = 200, description = "Primary stops, ascending by numeric id", body = StopListResponse),
        (status = 500, description = "Upstream failure", body = ErrorResponse)
    ),
    tag = "stops"
)]
pub async fn list_stops(
    State(ctx): State<AppContext>,
) -> Result<Json<StopListResponse>, (StatusCode, Json<ErrorResponse>)> {
    let stops = gtfs_static::fetch_stops(&ctx.http, &ctx.config.grt.stops_url)
        .await
        .map_err(|e| {
            error!(error = %e, "Stop list fetch failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
        })?;

    Ok(Json(StopListResponse {
        data: build_stop_list(stops),
    }))
}

/// Keeps primary (non-child) stop records, formats the display name and
/// sorts ascending by numeric id. Non-numeric ids sort last.
fn build_stop_list(stops: Vec<TransitStop>) -> Vec<StopEntry> {
    let mut entries: Vec<(i64, StopEntry)> = stops
        .into_iter()
        .filter(|stop| stop.parent_station.is_none())
        .map(|stop| {
            let numeric = stop.stop_id.parse::<i64>().unwrap_or(i64::MAX);
            let code = if stop.stop_code.is_empty() {
                stop.stop_id.clone()
            } else {
                stop.stop_code
            };
            (
                numeric,
                StopEntry {
                    id: stop.stop_id,
                    name: format!("({}) {}", code, stop.name),
                },
            )
        })
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.id.cmp(&b.1.id)));
    entries.into_iter().map(|(_, entry)| entry).collect()
}

pub fn router(ctx: AppContext) -> Router {
    Router::new().route("/", get(list_stops)).with_state(ctx)
}
