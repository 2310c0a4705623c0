//! Environment variable naming for configuration overrides and secrets.
//!
//! Plain settings are overridden with `{PREFIX}__SECTION__KEY` variables,
//! secrets referenced by the `secret_from_env` marker are read from
//! `SECTION_KEY` (e.g. `places.api_key` -> `PLACES_API_KEY`).

use std::env;

/// The default prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "WHERETOMEET";

/// The separator for configuration environment variables
pub const CONFIG_SEPARATOR: &str = "__";

/// The separator for secret environment variables
pub const SECRET_SEPARATOR: &str = "_";

/// Get the prefix for configuration environment variables
pub fn get_config_prefix() -> String {
    env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string())
}

/// Convert a configuration path to an environment variable name
///
/// `"server.port"` becomes `"WHERETOMEET__SERVER__PORT"` with the default prefix.
pub fn config_path_to_env_var(path: &str) -> String {
    let prefix = get_config_prefix();
    let path = path.replace('.', CONFIG_SEPARATOR);
    format!("{}{}{}", prefix, CONFIG_SEPARATOR, path).to_uppercase()
}

/// Convert a secret path to an environment variable name
///
/// `"supabase.service_role_key"` becomes `"SUPABASE_SERVICE_ROLE_KEY"`.
pub fn secret_path_to_env_var(path: &str) -> String {
    path.replace('.', SECRET_SEPARATOR).to_uppercase()
}

/// Paths whose values must never be logged.
pub fn is_secret_path(path: &str) -> bool {
    let path_lower = path.to_lowercase();
    path_lower.contains("secret") || path_lower.contains("key") || path_lower.contains("token")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_to_env_var() {
        env::remove_var("PREFIX");
        assert_eq!(
            config_path_to_env_var("server.host"),
            "WHERETOMEET__SERVER__HOST"
        );
        assert_eq!(
            config_path_to_env_var("store.notification_capacity"),
            "WHERETOMEET__STORE__NOTIFICATION_CAPACITY"
        );
    }

    #[test]
    fn test_secret_path_to_env_var() {
        assert_eq!(secret_path_to_env_var("places.api_key"), "PLACES_API_KEY");
        assert_eq!(
            secret_path_to_env_var("supabase.service_role_key"),
            "SUPABASE_SERVICE_ROLE_KEY"
        );
    }

    #[test]
    fn test_is_secret_path() {
        assert!(is_secret_path("places.api_key"));
        assert!(is_secret_path("supabase.anon_key"));
        assert!(!is_secret_path("server.host"));
        assert!(!is_secret_path("gcal.calendar_id"));
    }
}
