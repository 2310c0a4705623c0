// --- File: crates/wheretomeet_gcal/src/client.rs ---
//! Caller side of the scheduling gateway.
//!
//! Validates the date/time form locally, then posts to `POST /api/calendar`.
//! Any failure after validation is reported as an unsuccessful
//! [`ScheduleOutcome`], never as an error, so a failed attempt can be retried
//! by the user and never touches meeting state.

use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;
use wheretomeet_common::auth::PROVIDER_TOKEN_HEADER;
use wheretomeet_common::create_client;
use wheretomeet_common::models::ChosenLocation;

use crate::logic::{ScheduleRequest, ScheduleResponse};

const REQUEST_TIMEOUT_SECS: u64 = 15;

#[derive(Error, Debug, PartialEq)]
pub enum ScheduleError {
    #[error("Please pick both a date and a time")]
    MissingDateOrTime,
    #[error("Scheduling client setup failed: {0}")]
    Setup(String),
}

/// Date and time as entered by the user, e.g. `2026-10-20` and `18:30`.
#[derive(Debug, Clone, Default)]
pub struct ScheduleForm {
    pub date: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleOutcome {
    pub success: bool,
    pub event_id: Option<String>,
    /// Failure reason for display, when unsuccessful.
    pub message: Option<String>,
}

impl ScheduleOutcome {
    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            event_id: None,
            message: Some(message.into()),
        }
    }
}

/// Builds the gateway request for `venue` at the form's date and time.
///
/// The event is zero-length: start and end are the same local instant.
pub fn schedule_request(
    form: &ScheduleForm,
    venue: &ChosenLocation,
    time_zone: &str,
    meeting_id: Option<Uuid>,
) -> Result<ScheduleRequest, ScheduleError> {
    let date = form.date.trim();
    let time = form.time.trim();
    if date.is_empty() || time.is_empty() {
        return Err(ScheduleError::MissingDateOrTime);
    }
    let at = format!("{}T{}:00", date, time);
    Ok(ScheduleRequest {
        summary: format!("Meeting at {}", venue.name),
        location: venue.address.clone(),
        start_time: at.clone(),
        end_time: at,
        time_zone: time_zone.to_string(),
        meeting_id,
    })
}

pub struct SchedulingClient {
    client: Client,
    endpoint: String,
    session_token: String,
    provider_token: Option<String>,
}

impl SchedulingClient {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:8086`.
    pub fn new(base_url: &str, session_token: impl Into<String>) -> Result<Self, ScheduleError> {
        let client = create_client(REQUEST_TIMEOUT_SECS, false)
            .map_err(|e| ScheduleError::Setup(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: format!("{}/api/calendar", base_url.trim_end_matches('/')),
            session_token: session_token.into(),
            provider_token: None,
        })
    }

    /// OAuth token from the calendar provider, forwarded for event creation.
    pub fn with_provider_token(mut self, token: impl Into<String>) -> Self {
        self.provider_token = Some(token.into());
        self
    }

    pub async fn schedule(
        &self,
        form: &ScheduleForm,
        venue: &ChosenLocation,
        time_zone: &str,
        meeting_id: Option<Uuid>,
    ) -> Result<ScheduleOutcome, ScheduleError> {
        let body = schedule_request(form, venue, time_zone, meeting_id)?;

        let mut request = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.session_token)
            .json(&body);
        if let Some(token) = &self.provider_token {
            request = request.header(PROVIDER_TOKEN_HEADER, token);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("scheduling request failed: {}", e);
                return Ok(ScheduleOutcome::failed("Could not reach the scheduling service"));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let reason = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "scheduling rejected: {}", reason);
            let message = if reason.trim().is_empty() {
                format!("Scheduling failed ({})", status)
            } else {
                reason
            };
            return Ok(ScheduleOutcome::failed(message));
        }

        match response.json::<ScheduleResponse>().await {
            Ok(created) if created.success => {
                info!(event_id = %created.event_id, "meeting added to calendar");
                Ok(ScheduleOutcome {
                    success: true,
                    event_id: Some(created.event_id),
                    message: None,
                })
            }
            Ok(_) => Ok(ScheduleOutcome::failed("Scheduling failed")),
            Err(e) => {
                warn!("unreadable scheduling response: {}", e);
                Ok(ScheduleOutcome::failed("Unexpected response from the scheduling service"))
            }
        }
    }
}
