//! Runtime feature switches.
//!
//! An integration is active only when its `use_*` flag is set and its config
//! section is present. Routes and services for inactive integrations are not
//! constructed.

use std::sync::Arc;
use wheretomeet_config::AppConfig;

/// `true` when the flag is set and the feature's section exists.
pub fn is_feature_enabled<T>(use_feature: bool, feature_config: Option<&T>) -> bool {
    use_feature && feature_config.is_some()
}

pub fn is_places_enabled(config: &Arc<AppConfig>) -> bool {
    is_feature_enabled(config.use_places, config.places.as_ref())
}

pub fn is_gcal_enabled(config: &Arc<AppConfig>) -> bool {
    is_feature_enabled(config.use_gcal, config.gcal.as_ref())
}

pub fn is_supabase_enabled(config: &Arc<AppConfig>) -> bool {
    is_feature_enabled(config.use_supabase, config.supabase.as_ref())
}
