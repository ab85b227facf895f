pub mod alerts;
pub mod departures;
pub mod go_departures;
pub mod health;
pub mod stops;

use std::sync::Arc;

use axum::Router;
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::Config;
use crate::providers::go_transit::GoClient;
use crate::providers::grt::GrtClient;

/// Error body for plain-JSON endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Shared clients and settings handed to every endpoint.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub grt: Arc<GrtClient>,
    pub go: Arc<GoClient>,
    /// Bare client for the alert feed and the static stop list.
    pub http: reqwest::Client,
    pub tz: chrono_tz::Tz,
}

pub fn router(ctx: AppContext) -> Router {
    Router::new()
        .nest("/departures", departures::router(ctx.clone()))
        .nest("/stops", stops::router(ctx.clone()))
        .nest("/alerts", alerts::router(ctx.clone()))
        .nest("/go-departures", go_departures::router(ctx))
        .nest("/health", health::router())
}
