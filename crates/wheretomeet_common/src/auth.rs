// --- File: crates/wheretomeet_common/src/auth.rs ---
//! Request authentication shared by every protected route.
//!
//! The session token travels as `Authorization: Bearer <token>`. The user's
//! OAuth provider token, needed only for calendar calls, travels separately in
//! [`PROVIDER_TOKEN_HEADER`].

use axum::http::{header, HeaderMap};
use tracing::{debug, error};

use crate::error::{auth_error, config_error, external_service_error, WhereToMeetError};
use crate::services::{AuthUser, SharedAuthProvider};

pub const PROVIDER_TOKEN_HEADER: &str = "x-provider-token";

/// Default landing path after sign-in.
pub const DEFAULT_LANDING_PATH: &str = "/dashboard";

/// The bearer token of the request, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

pub fn provider_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(PROVIDER_TOKEN_HEADER)?
        .to_str()
        .ok()
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Resolves the signed-in user of a request.
///
/// Missing or rejected tokens are an auth error (401). A missing auth backend
/// is a configuration error and a failing one an external-service error; both
/// fail only this request.
pub async fn require_user(
    provider: Option<&SharedAuthProvider>,
    headers: &HeaderMap,
) -> Result<AuthUser, WhereToMeetError> {
    let token = bearer_token(headers).ok_or_else(|| auth_error("sign-in required"))?;
    let provider = provider.ok_or_else(|| config_error("auth backend is not configured"))?;

    match provider.authenticate(token).await {
        Ok(Some(user)) => {
            debug!(user_id = %user.id, "request authenticated");
            Ok(user)
        }
        Ok(None) => Err(auth_error("session is invalid or expired")),
        Err(e) => {
            error!("auth backend failed: {}", e);
            Err(external_service_error("auth", e))
        }
    }
}

/// Sanitises a post sign-in redirect target.
///
/// Only local absolute paths are honoured; anything else (absolute URLs,
/// protocol-relative `//host` forms, empty values) falls back to
/// [`DEFAULT_LANDING_PATH`].
pub fn redirect_target(redirect_to: Option<&str>) -> String {
    match redirect_to {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path.to_string()
        }
        _ => DEFAULT_LANDING_PATH.to_string(),
    }
}

/// Sign-in URL that returns the user to `path` afterwards.
pub fn sign_in_url(path: &str) -> String {
    let query = serde_urlencoded::to_string([("redirectTo", path)]).unwrap_or_default();
    format!("/auth?{}", query)
}
