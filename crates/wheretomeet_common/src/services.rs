// --- File: crates/wheretomeet_common/src/services.rs ---
//! Service abstractions for external services.
//!
//! Every external collaborator (places provider, calendar provider, auth
//! backend) sits behind a trait here, so handlers and the session controller
//! receive explicitly owned handles and tests can substitute fakes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::models::{NearbyQuery, ResolvedPlace, VenueCandidate, VenueDetail};

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A type-erased error, used where services are shared as trait objects.
#[derive(Debug)]
pub struct BoxedError(pub Box<dyn StdError + Send + Sync>);

impl fmt::Display for BoxedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for BoxedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl From<Box<dyn StdError + Send + Sync>> for BoxedError {
    fn from(err: Box<dyn StdError + Send + Sync>) -> Self {
        BoxedError(err)
    }
}

fn boxed<E: StdError + Send + Sync + 'static>(err: E) -> BoxedError {
    BoxedError(Box::new(err))
}

/// Place search capability (geocoding, nearby search, details).
pub trait PlacesService: Send + Sync {
    /// Error type returned by places operations.
    type Error: StdError + Send + Sync + 'static;

    /// Venues around a point. An empty vector means the provider found nothing.
    fn nearby_search(&self, query: NearbyQuery) -> BoxFuture<'_, Vec<VenueCandidate>, Self::Error>;

    /// Whether the place is open right now, `None` when the provider does not know.
    fn open_now(&self, place_id: &str) -> BoxFuture<'_, Option<bool>, Self::Error>;

    /// Free-text lookup, best match first.
    fn text_search(&self, query: &str) -> BoxFuture<'_, Vec<ResolvedPlace>, Self::Error>;

    /// Extended details for one place, `None` when the id is unknown.
    fn place_details(&self, place_id: &str) -> BoxFuture<'_, Option<VenueDetail>, Self::Error>;
}

/// A calendar event as handed to the calendar provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarEvent {
    pub summary: String,
    pub location: String,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// IANA zone the times should be displayed in.
    pub time_zone: String,
    pub attendees: Vec<String>,
}

/// Represents the result of a calendar event operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEventResult {
    pub event_id: Option<String>,
    pub status: String,
}

/// Calendar provider acting on behalf of the signed-in user.
pub trait CalendarService: Send + Sync {
    /// Error type returned by calendar service operations.
    type Error: StdError + Send + Sync + 'static;

    /// Create an event in `calendar_id` using the user's OAuth access token.
    fn create_event(
        &self,
        access_token: &str,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error>;
}

/// A signed-in user as reported by the auth backend.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
}

/// Auth backend: resolves session tokens and looks up users.
pub trait AuthProvider: Send + Sync {
    /// Error type returned when the backend itself fails.
    type Error: StdError + Send + Sync + 'static;

    /// `Ok(None)` when the token is not a valid session.
    fn authenticate(&self, access_token: &str) -> BoxFuture<'_, Option<AuthUser>, Self::Error>;

    /// E-mail address of a user by id, `Ok(None)` when the user does not exist.
    fn user_email(&self, user_id: &str) -> BoxFuture<'_, Option<String>, Self::Error>;
}

pub type SharedPlacesService = Arc<dyn PlacesService<Error = BoxedError>>;
pub type SharedCalendarService = Arc<dyn CalendarService<Error = BoxedError>>;
pub type SharedAuthProvider = Arc<dyn AuthProvider<Error = BoxedError>>;

/// Adapter that erases a service's concrete error type so it can be shared
/// as one of the `Shared*` trait objects.
pub struct ErasedErrors<S>(pub S);

impl<S: PlacesService> PlacesService for ErasedErrors<S> {
    type Error = BoxedError;

    fn nearby_search(&self, query: NearbyQuery) -> BoxFuture<'_, Vec<VenueCandidate>, Self::Error> {
        Box::pin(async move { self.0.nearby_search(query).await.map_err(boxed) })
    }

    fn open_now(&self, place_id: &str) -> BoxFuture<'_, Option<bool>, Self::Error> {
        let place_id = place_id.to_string();
        Box::pin(async move { self.0.open_now(&place_id).await.map_err(boxed) })
    }

    fn text_search(&self, query: &str) -> BoxFuture<'_, Vec<ResolvedPlace>, Self::Error> {
        let query = query.to_string();
        Box::pin(async move { self.0.text_search(&query).await.map_err(boxed) })
    }

    fn place_details(&self, place_id: &str) -> BoxFuture<'_, Option<VenueDetail>, Self::Error> {
        let place_id = place_id.to_string();
        Box::pin(async move { self.0.place_details(&place_id).await.map_err(boxed) })
    }
}

impl<S: CalendarService> CalendarService for ErasedErrors<S> {
    type Error = BoxedError;

    fn create_event(
        &self,
        access_token: &str,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
        let access_token = access_token.to_string();
        let calendar_id = calendar_id.to_string();
        Box::pin(async move {
            self.0
                .create_event(&access_token, &calendar_id, event)
                .await
                .map_err(boxed)
        })
    }
}

impl<S: AuthProvider> AuthProvider for ErasedErrors<S> {
    type Error = BoxedError;

    fn authenticate(&self, access_token: &str) -> BoxFuture<'_, Option<AuthUser>, Self::Error> {
        let access_token = access_token.to_string();
        Box::pin(async move { self.0.authenticate(&access_token).await.map_err(boxed) })
    }

    fn user_email(&self, user_id: &str) -> BoxFuture<'_, Option<String>, Self::Error> {
        let user_id = user_id.to_string();
        Box::pin(async move { self.0.user_email(&user_id).await.map_err(boxed) })
    }
}

/// A factory for the services enabled by configuration.
pub trait ServiceFactory: Send + Sync {
    fn places_service(&self) -> Option<SharedPlacesService>;

    fn calendar_service(&self) -> Option<SharedCalendarService>;

    fn auth_provider(&self) -> Option<SharedAuthProvider>;
}
