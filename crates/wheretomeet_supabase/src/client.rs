//! Supabase Auth (GoTrue) client.
//!
//! Resolves session access tokens to users through `GET /auth/v1/user` and,
//! with the service-role key, looks up other users through the admin API.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};
use wheretomeet_common::services::{AuthProvider, AuthUser, BoxFuture};
use wheretomeet_config::{SupabaseConfig, SECRET_MARKER};

/// Errors that can occur when talking to Supabase
#[derive(Error, Debug)]
pub enum SupabaseError {
    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Supabase API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Missing configuration: {0}")]
    ConfigError(String),
}

#[derive(Debug, Deserialize)]
struct GoTrueUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum Lookup {
    /// The caller's own session token.
    Session,
    /// Admin API with the service-role key.
    Admin,
}

fn is_set(value: &str) -> bool {
    !value.trim().is_empty() && value != SECRET_MARKER
}

/// Auth provider backed by a Supabase project.
pub struct SupabaseAuthProvider {
    client: Client,
    base_url: String,
    anon_key: String,
    service_role_key: Option<String>,
}

impl SupabaseAuthProvider {
    pub fn new(config: &SupabaseConfig) -> Result<Self, SupabaseError> {
        if !is_set(&config.url) {
            return Err(SupabaseError::ConfigError("supabase.url is not set".to_string()));
        }
        if !is_set(&config.anon_key) {
            return Err(SupabaseError::ConfigError("supabase.anon_key is not set".to_string()));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            service_role_key: config.service_role_key.clone().filter(|key| is_set(key)),
        })
    }

    /// GET a user record. 404 is an absent user; a rejected key on the admin
    /// API is a configuration fault, while a rejected session token is not.
    async fn fetch_user(
        &self,
        lookup: Lookup,
        url: String,
        api_key: &str,
        bearer: &str,
    ) -> Result<Option<GoTrueUser>, SupabaseError> {
        let response = self
            .client
            .get(&url)
            .header("apikey", api_key)
            .bearer_auth(bearer)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(Some(response.json().await?)),
            StatusCode::NOT_FOUND => {
                debug!("Supabase has no such user");
                Ok(None)
            }
            status @ (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => match lookup {
                Lookup::Session => {
                    debug!("Supabase rejected session token with {}", status);
                    Ok(None)
                }
                Lookup::Admin => {
                    warn!("Supabase rejected the service role key with {}", status);
                    Err(SupabaseError::ConfigError(format!(
                        "supabase.service_role_key was rejected ({})",
                        status.as_u16()
                    )))
                }
            },
            status => {
                let message = response.text().await.unwrap_or_default();
                warn!("Supabase user lookup failed with {}: {}", status, message);
                Err(SupabaseError::ApiError {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}

impl AuthProvider for SupabaseAuthProvider {
    type Error = SupabaseError;

    fn authenticate(&self, access_token: &str) -> BoxFuture<'_, Option<AuthUser>, Self::Error> {
        let access_token = access_token.to_string();
        Box::pin(async move {
            let url = format!("{}/auth/v1/user", self.base_url);
            let user = self.fetch_user(Lookup::Session, url, &self.anon_key, &access_token).await?;
            Ok(user.map(|user| AuthUser {
                id: user.id,
                email: user.email,
            }))
        })
    }

    fn user_email(&self, user_id: &str) -> BoxFuture<'_, Option<String>, Self::Error> {
        let user_id = user_id.to_string();
        Box::pin(async move {
            let key = self.service_role_key.as_deref().ok_or_else(|| {
                SupabaseError::ConfigError("supabase.service_role_key is not set".to_string())
            })?;
            let url = format!("{}/auth/v1/admin/users/{}", self.base_url, user_id);
            let user = self.fetch_user(Lookup::Admin, url, key, key).await?;
            Ok(user.and_then(|user| user.email))
        })
    }
}
