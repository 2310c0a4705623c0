// --- File: crates/wheretomeet_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origin used when building share links, e.g. "https://wheretomeet.app".
    #[serde(default)]
    pub public_base_url: Option<String>,
}

impl ServerConfig {
    /// Base URL for links handed to participants. Falls back to the bind address.
    pub fn link_base(&self) -> String {
        match &self.public_base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://{}:{}", self.host, self.port),
        }
    }
}

// --- Logging Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// When set, logs are also written to daily rolling files in this directory.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
        }
    }
}

// --- Google Places Config ---
// api_key is usually "secret_from_env" and resolved from PLACES_API_KEY.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PlacesConfig {
    pub api_key: String,
    #[serde(default = "default_places_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_places_base_url() -> String {
    "https://maps.googleapis.com/maps/api/place".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

// --- Supabase Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
    /// Needed only for resolving other users' e-mail addresses.
    #[serde(default)]
    pub service_role_key: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

// --- Google Calendar Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GcalConfig {
    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,
    #[serde(default = "default_event_description")]
    pub event_description: String,
    /// Used when a scheduling request carries an empty time zone.
    #[serde(default)]
    pub default_time_zone: Option<String>,
}

fn default_calendar_id() -> String {
    "primary".to_string()
}

fn default_event_description() -> String {
    "Meeting scheduled via WhereToMeet".to_string()
}

// --- Meeting Store Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StoreConfig {
    /// Buffered change notifications per meeting before slow subscribers lag.
    #[serde(default = "default_notification_capacity")]
    pub notification_capacity: usize,
}

fn default_notification_capacity() -> usize {
    64
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            notification_capacity: default_notification_capacity(),
        }
    }
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub store: StoreConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_places: bool,
    #[serde(default)]
    pub use_gcal: bool,
    #[serde(default)]
    pub use_supabase: bool,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub places: Option<PlacesConfig>,
    #[serde(default)]
    pub gcal: Option<GcalConfig>,
    #[serde(default)]
    pub supabase: Option<SupabaseConfig>,
}

impl AppConfig {
    /// Minimal configuration with every integration switched off.
    pub fn local(host: &str, port: u16) -> Self {
        Self {
            server: ServerConfig {
                host: host.to_string(),
                port,
                public_base_url: None,
            },
            logging: LoggingConfig::default(),
            store: StoreConfig::default(),
            use_places: false,
            use_gcal: false,
            use_supabase: false,
            places: None,
            gcal: None,
            supabase: None,
        }
    }
}
