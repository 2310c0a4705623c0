// --- File: crates/wheretomeet_common/src/lib.rs ---

pub mod auth; // Request authentication helpers
pub mod error; // Error handling
pub mod features; // Runtime feature switches
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities
pub mod models; // The meeting record and related values
#[cfg(test)]
mod models_test;
pub mod services; // Service abstractions
#[cfg(any(test, feature = "test-util"))]
pub mod testing;

// Re-export error types and utilities for easier access
pub use error::{
    auth_error, config_error, conflict, external_service_error, forbidden, internal_error,
    not_found, validation_error, HttpStatusCode, WhereToMeetError,
};

pub use http::{client::create_client, IntoHttpResponse};

pub use logging::{init, init_from_config, init_with_level, log_result};

pub use features::{is_feature_enabled, is_gcal_enabled, is_places_enabled, is_supabase_enabled};
