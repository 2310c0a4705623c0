// --- File: crates/wheretomeet_gcal/src/service.rs ---
//! Google Calendar implementation of [`CalendarService`].

use google_calendar3::api::{Event, EventAttendee, EventDateTime, EventReminders};
use thiserror::Error;
use tracing::info;
use wheretomeet_common::services::{BoxFuture, CalendarEvent, CalendarEventResult, CalendarService};
use wheretomeet_common::{internal_error, WhereToMeetError};

use crate::auth::HubFactory;

/// Errors that can occur while scheduling an event.
#[derive(Error, Debug)]
pub enum GcalServiceError {
    #[error("Google API Error: {0}")]
    ApiError(#[from] google_calendar3::Error),
    #[error("Failed to parse time: {0}")]
    TimeParseError(String),
    #[error("Unknown time zone: {0}")]
    InvalidTimeZone(String),
    #[error("Calculation error: {0}")]
    CalculationError(String),
    #[error("Calendar client setup failed: {0}")]
    SetupError(String),
}

impl From<GcalServiceError> for WhereToMeetError {
    fn from(err: GcalServiceError) -> Self {
        match err {
            GcalServiceError::TimeParseError(_)
            | GcalServiceError::InvalidTimeZone(_)
            | GcalServiceError::CalculationError(_) => {
                WhereToMeetError::ValidationError(err.to_string())
            }
            other => internal_error(format!("Failed to create calendar event: {}", other)),
        }
    }
}

pub struct GoogleCalendarService {
    hubs: HubFactory,
}

impl GoogleCalendarService {
    pub fn new() -> Result<Self, GcalServiceError> {
        let hubs = HubFactory::new().map_err(|e| GcalServiceError::SetupError(e.to_string()))?;
        Ok(Self { hubs })
    }
}

fn event_time(at: chrono::DateTime<chrono::Utc>, time_zone: &str) -> EventDateTime {
    EventDateTime {
        date_time: Some(at),
        time_zone: Some(time_zone.to_string()),
        ..Default::default()
    }
}

/// Maps the provider-neutral event onto the Google API shape.
pub fn to_google_event(event: CalendarEvent) -> Event {
    let attendees = (!event.attendees.is_empty()).then(|| {
        event
            .attendees
            .into_iter()
            .map(|email| EventAttendee {
                email: Some(email),
                ..Default::default()
            })
            .collect()
    });

    Event {
        summary: Some(event.summary),
        location: Some(event.location),
        description: event.description,
        start: Some(event_time(event.start, &event.time_zone)),
        end: Some(event_time(event.end, &event.time_zone)),
        attendees,
        reminders: Some(EventReminders {
            use_default: Some(true),
            ..Default::default()
        }),
        ..Default::default()
    }
}

impl CalendarService for GoogleCalendarService {
    type Error = GcalServiceError;

    fn create_event(
        &self,
        access_token: &str,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
        let hub = self.hubs.hub_for(access_token);
        let calendar_id = calendar_id.to_string();

        Box::pin(async move {
            let (_response, created_event) = hub
                .events()
                .insert(to_google_event(event), &calendar_id)
                .send_updates("all")
                .doit()
                .await?;

            info!(event_id = ?created_event.id, "calendar event created");
            Ok(CalendarEventResult {
                event_id: created_event.id,
                status: created_event.status.unwrap_or_else(|| "confirmed".to_string()),
            })
        })
    }
}
