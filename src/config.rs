use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_listen_addr")]
    pub listen_addr: String,
    /// IANA timezone for wall-clock rendering and naive upstream timestamps.
    #[serde(default = "Config::default_timezone")]
    pub timezone: String,
    /// Allowed CORS origins. Ignored when cors_permissive is true.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Allow all origins. Defaults to true; the device is not a browser.
    #[serde(default = "default_true")]
    pub cors_permissive: bool,
    #[serde(default)]
    pub grt: GrtConfig,
    #[serde(default)]
    pub go: GoConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: Self::default_listen_addr(),
            timezone: Self::default_timezone(),
            cors_origins: Vec::new(),
            cors_permissive: true,
            grt: GrtConfig::default(),
            go: GoConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Config {
    fn default_listen_addr() -> String {
        "0.0.0.0:3000".to_string()
    }
    fn default_timezone() -> String {
        "America/Toronto".to_string()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Fills settings that may come from the environment instead of the
    /// config file. Currently only the GO pre-shared key.
    pub fn apply_env(&mut self) {
        if self.go.api_key.is_none() {
            self.go.api_key = std::env::var("GO_API_KEY").ok().filter(|k| !k.is_empty());
        }
    }

    pub fn tz(&self) -> Result<chrono_tz::Tz, ConfigError> {
        self.timezone
            .parse()
            .map_err(|_| ConfigError::BadTimezone(self.timezone.clone()))
    }
}

fn default_true() -> bool {
    true
}

/// Configuration for the regional transit (GRT) provider.
#[derive(Debug, Clone, Deserialize)]
pub struct GrtConfig {
    #[serde(default = "GrtConfig::default_graphql_url")]
    pub graphql_url: String,
    /// Cap on arrivals requested per stop (default: 30).
    #[serde(default = "GrtConfig::default_arrivals_per_stop")]
    pub arrivals_per_stop: u32,
    /// Forward display window for departures, in minutes (default: 120).
    #[serde(default = "GrtConfig::default_window_minutes")]
    pub window_minutes: i64,
    #[serde(default = "GrtConfig::default_alerts_url")]
    pub alerts_url: String,
    #[serde(default = "GrtConfig::default_stops_url")]
    pub stops_url: String,
    /// Append in-scope alert frames to /departures responses (default: true).
    #[serde(default = "default_true")]
    pub include_alerts: bool,
}

impl Default for GrtConfig {
    fn default() -> Self {
        Self {
            graphql_url: Self::default_graphql_url(),
            arrivals_per_stop: Self::default_arrivals_per_stop(),
            window_minutes: Self::default_window_minutes(),
            alerts_url: Self::default_alerts_url(),
            stops_url: Self::default_stops_url(),
            include_alerts: true,
        }
    }
}

impl GrtConfig {
    fn default_graphql_url() -> String {
        "https://api.grt.ca/graphql".to_string()
    }
    fn default_arrivals_per_stop() -> u32 {
        30
    }
    fn default_window_minutes() -> i64 {
        120
    }
    fn default_alerts_url() -> String {
        "https://api.grt.ca/gtfs-realtime/alerts.pb".to_string()
    }
    fn default_stops_url() -> String {
        "https://api.grt.ca/gtfs/stops.txt".to_string()
    }
}

/// Configuration for the GO Transit rail provider.
#[derive(Debug, Clone, Deserialize)]
pub struct GoConfig {
    #[serde(default = "GoConfig::default_api_url")]
    pub api_url: String,
    /// Station queried for next services (default: Kitchener).
    #[serde(default = "GoConfig::default_station_code")]
    pub station_code: String,
    /// Pre-shared API key; may also come from the GO_API_KEY env var.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Absolute eligibility window for trips, in minutes (default: 180).
    #[serde(default = "GoConfig::default_window_minutes")]
    pub window_minutes: i64,
    /// Cap on distinct lines rendered (default: 10).
    #[serde(default = "GoConfig::default_max_trips")]
    pub max_trips: usize,
    /// Line code -> rider-facing line name.
    #[serde(default = "GoConfig::default_line_names")]
    pub line_names: HashMap<String, String>,
    /// Line name -> device icon id. Missing entries render no icon.
    #[serde(default = "GoConfig::default_line_icons")]
    pub line_icons: HashMap<String, String>,
}

impl Default for GoConfig {
    fn default() -> Self {
        Self {
            api_url: Self::default_api_url(),
            station_code: Self::default_station_code(),
            api_key: None,
            window_minutes: Self::default_window_minutes(),
            max_trips: Self::default_max_trips(),
            line_names: Self::default_line_names(),
            line_icons: Self::default_line_icons(),
        }
    }
}

impl GoConfig {
    fn default_api_url() -> String {
        "https://api.openmetrolinx.com/OpenDataAPI".to_string()
    }
    fn default_station_code() -> String {
        "KI".to_string()
    }
    fn default_window_minutes() -> i64 {
        180
    }
    fn default_max_trips() -> usize {
        10
    }

    fn default_line_names() -> HashMap<String, String> {
        [
            ("LW", "Lakeshore West"),
            ("LE", "Lakeshore East"),
            ("KI", "Kitchener"),
            ("MI", "Milton"),
            ("BR", "Barrie"),
            ("RH", "Richmond Hill"),
            ("ST", "Stouffville"),
        ]
        .into_iter()
        .map(|(code, name)| (code.to_string(), name.to_string()))
        .collect()
    }

    fn default_line_icons() -> HashMap<String, String> {
        [
            ("Kitchener", "i1395"),
            ("Lakeshore West", "i11033"),
            ("Lakeshore East", "i11034"),
            ("Milton", "i9925"),
            ("Barrie", "i8685"),
            ("Richmond Hill", "i7956"),
            ("Stouffville", "i12265"),
        ]
        .into_iter()
        .map(|(name, icon)| (name.to_string(), icon.to_string()))
        .collect()
    }
}

/// Rendering rules for the departure board.
///
/// The canonical rule set; earlier display conventions ("Now" labels,
/// 50-char alert truncation) are intentionally not configurable.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Minutes at or below which a time renders as the due label (default: 1).
    #[serde(default = "DisplayConfig::default_due_threshold_minutes")]
    pub due_threshold_minutes: i64,
    #[serde(default = "DisplayConfig::default_due_label")]
    pub due_label: String,
    /// Soonest times shown per group frame (default: 2).
    #[serde(default = "DisplayConfig::default_times_per_frame")]
    pub times_per_frame: usize,
    /// Route groups kept per origin stop (default: 3).
    #[serde(default = "DisplayConfig::default_max_groups_per_stop")]
    pub max_groups_per_stop: usize,
    /// Total alert frame text length, ellipsis included (default: 100).
    #[serde(default = "DisplayConfig::default_alert_text_limit")]
    pub alert_text_limit: usize,
    /// Exact route codes rendered with the light-rail bitmap.
    #[serde(default = "DisplayConfig::default_rail_routes")]
    pub rail_routes: Vec<String>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            due_threshold_minutes: Self::default_due_threshold_minutes(),
            due_label: Self::default_due_label(),
            times_per_frame: Self::default_times_per_frame(),
            max_groups_per_stop: Self::default_max_groups_per_stop(),
            alert_text_limit: Self::default_alert_text_limit(),
            rail_routes: Self::default_rail_routes(),
        }
    }
}

impl DisplayConfig {
    fn default_due_threshold_minutes() -> i64 {
        1
    }
    fn default_due_label() -> String {
        "Due".to_string()
    }
    fn default_times_per_frame() -> usize {
        2
    }
    fn default_max_groups_per_stop() -> usize {
        3
    }
    fn default_alert_text_limit() -> usize {
        100
    }
    fn default_rail_routes() -> Vec<String> {
        vec!["301".to_string(), "302".to_string()]
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse config: {0}")]
    ParseError(String),
    #[error("Unknown timezone: {0}")]
    BadTimezone(String),
}
