// --- File: crates/wheretomeet_config/src/lib.rs ---
use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::env;
use std::path::PathBuf;
use tracing::{debug, warn};

pub mod env_vars;
pub mod models;
pub use models::*;

/// Marker value replaced at load time by an environment variable.
pub const SECRET_MARKER: &str = "secret_from_env";

/// Loads the layered runtime configuration.
///
/// Sources, later ones winning:
/// 1. `{CONFIG_DIR}/default.*`
/// 2. `{CONFIG_DIR}/{RUN_ENV}.*`
/// 3. environment variables `{PREFIX}__SECTION__KEY`
///
/// Any string value equal to [`SECRET_MARKER`] is then resolved from the
/// environment (see [`apply_env_overrides_from_marker`]).
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env_vars::get_config_prefix();
    let config_dir = PathBuf::from(env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string()));

    let default_path = config_dir.join("default");
    let env_path = config_dir.join(&run_env);
    debug!(
        "Loading config from {} and {} (overrides like {})",
        default_path.display(),
        env_path.display(),
        env_vars::config_path_to_env_var("server.port")
    );

    let builder = Config::builder()
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(
            Environment::with_prefix(&prefix)
                .separator(env_vars::CONFIG_SEPARATOR)
                .try_parsing(true),
        );

    let raw_config: AppConfig = builder.build()?.try_deserialize()?;
    apply_env_overrides_from_marker(raw_config)
}

/// Recursively replaces all "secret_from_env" string values with environment variable values
fn inject_env_secrets(value: &mut Value) {
    fn walk(path: Vec<String>, obj: &mut Value) {
        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    let mut new_path = path.clone();
                    new_path.push(k.to_string());
                    walk(new_path, v);
                }
            }
            Value::String(s) if s == SECRET_MARKER => {
                let dotted = path.join(".");
                if !env_vars::is_secret_path(&dotted) {
                    debug!("{} on non-secret path {}", SECRET_MARKER, dotted);
                }
                let env_key = env_vars::secret_path_to_env_var(&dotted);
                match env::var(&env_key) {
                    Ok(env_val) => *obj = Value::String(env_val),
                    Err(_) => warn!("env var {} not found for {}", env_key, SECRET_MARKER),
                }
            }
            _ => {}
        }
    }

    walk(vec![], value);
}

/// Applies environment overrides based on "secret_from_env" markers in serialized config
pub fn apply_env_overrides_from_marker(config: AppConfig) -> Result<AppConfig, ConfigError> {
    let mut json = serde_json::to_value(&config)
        .map_err(|err| ConfigError::Message(format!("failed to serialize config: {err}")))?;
    inject_env_secrets(&mut json);
    serde_json::from_value(json)
        .map_err(|err| ConfigError::Message(format!("failed to rebuild config: {err}")))
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Loads the dotenv file into the process environment, at most once.
///
/// The file is taken from `DOTENV_OVERRIDE`, else from a first command line
/// argument starting with ".env", else ".env". Returns the path that was used.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_values_are_resolved_from_environment() {
        env::set_var("PLACES_API_KEY", "test-places-key");
        let mut config = AppConfig::local("127.0.0.1", 8080);
        config.places = Some(PlacesConfig {
            api_key: SECRET_MARKER.to_string(),
            base_url: "http://localhost".to_string(),
            request_timeout_secs: 5,
        });

        let config = apply_env_overrides_from_marker(config).unwrap();
        assert_eq!(config.places.unwrap().api_key, "test-places-key");
    }

    #[test]
    fn missing_secret_keeps_marker() {
        let mut config = AppConfig::local("127.0.0.1", 8080);
        config.supabase = Some(SupabaseConfig {
            url: "http://localhost".to_string(),
            anon_key: SECRET_MARKER.to_string(),
            service_role_key: None,
            request_timeout_secs: 5,
        });
        env::remove_var("SUPABASE_ANON_KEY");

        let config = apply_env_overrides_from_marker(config).unwrap();
        assert_eq!(config.supabase.unwrap().anon_key, SECRET_MARKER);
    }

    #[test]
    fn optional_sections_default_when_absent() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "server": { "host": "0.0.0.0", "port": 3000 }
        }))
        .unwrap();

        assert!(!config.use_places);
        assert!(config.places.is_none());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.store.notification_capacity, 64);
        assert_eq!(config.server.link_base(), "http://0.0.0.0:3000");
    }

    #[test]
    fn gcal_section_defaults() {
        let gcal: GcalConfig = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(gcal.calendar_id, "primary");
        assert_eq!(gcal.event_description, "Meeting scheduled via WhereToMeet");
    }
}
