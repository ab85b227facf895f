mod api;
mod board;
mod config;
mod display;
mod models;
mod providers;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api::AppContext;
use config::Config;
use providers::go_transit::GoClient;
use providers::grt::GrtClient;

#[derive(OpenApi)]
#[openapi(
    info(title = "LaMetric Transit API", version = "0.1.0"),
    paths(
        api::departures::get_departures,
        api::stops::list_stops,
        api::alerts::get_alerts,
        api::go_departures::get_go_departures,
        api::health::health_check,
    ),
    components(schemas(
        display::Frame,
        display::GoalData,
        display::FrameResponse,
        api::ErrorResponse,
        api::stops::StopEntry,
        api::stops::StopListResponse,
        api::health::HealthResponse,
    )),
    tags(
        (name = "departures", description = "Departure board frames"),
        (name = "stops", description = "Stop directory"),
        (name = "alerts", description = "Service alert frames"),
        (name = "go", description = "GO rail departure frames"),
        (name = "health", description = "Service health check")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .init();

    // Load config
    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());
    let mut config = if std::path::Path::new(&config_path).exists() {
        Config::load(&config_path).expect("Failed to load config")
    } else {
        tracing::warn!(path = %config_path, "Config file not found, using defaults");
        Config::default()
    };
    config.apply_env();
    let tz = config.tz().expect("Invalid timezone in config");
    tracing::info!(
        timezone = %config.timezone,
        go_key_configured = config.go.api_key.is_some(),
        "Loaded configuration"
    );

    // Build CORS layer based on config
    let cors_layer = if config.cors_permissive {
        CorsLayer::permissive()
    } else {
        tracing::info!(origins = ?config.cors_origins, "CORS: Restricting to configured origins");
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([axum::http::Method::GET, axum::http::Method::OPTIONS])
            .allow_headers([axum::http::header::CONTENT_TYPE])
    };

    // Upstream clients, built once; every request reuses them
    let grt = Arc::new(GrtClient::new(&config.grt).expect("Failed to build GRT client"));
    let go = Arc::new(GoClient::new(&config.go).expect("Failed to build GO client"));
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .expect("Failed to build HTTP client");

    let listen_addr = config.listen_addr.clone();
    let ctx = AppContext {
        config: Arc::new(config),
        grt,
        go,
        http,
        tz,
    };

    // Build the app
    let app = Router::new()
        .merge(api::router(ctx))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer);

    // Start server
    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .expect("Failed to bind listen address");

    tracing::info!(addr = %listen_addr, "Server running");
    tracing::info!("Swagger UI: http://localhost:3000/swagger-ui");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
