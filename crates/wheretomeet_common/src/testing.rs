// --- File: crates/wheretomeet_common/src/testing.rs ---
//! In-memory stand-ins for the external services, for tests in every crate.
//!
//! Enabled by `cfg(test)` here and by the `test-util` feature elsewhere.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::models::{LatLng, NearbyQuery, ResolvedPlace, VenueCandidate, VenueDetail};
use crate::services::{
    AuthProvider, AuthUser, BoxFuture, BoxedError, CalendarEvent, CalendarEventResult,
    CalendarService, PlacesService, SharedAuthProvider, SharedCalendarService,
    SharedPlacesService,
};

fn fail(message: &str) -> BoxedError {
    BoxedError(message.to_string().into())
}

/// A candidate with the fields tests usually care about.
pub fn candidate(place_id: &str, rating: Option<f64>) -> VenueCandidate {
    VenueCandidate {
        place_id: place_id.to_string(),
        name: format!("Venue {}", place_id),
        vicinity: format!("{} Main St", place_id),
        rating,
        review_count: rating.map(|_| 10),
        geometry: LatLng::new(40.01, -73.01),
        open_now: None,
    }
}

/// Auth backend keyed by bearer token.
#[derive(Default)]
pub struct StaticAuthProvider {
    users: HashMap<String, AuthUser>,
    broken: bool,
    lookups_broken: bool,
}

impl StaticAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, token: &str, id: &str, email: Option<&str>) -> Self {
        self.users.insert(
            token.to_string(),
            AuthUser {
                id: id.to_string(),
                email: email.map(str::to_string),
            },
        );
        self
    }

    /// Every call fails as if the backend were down.
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    /// Sessions still resolve, but e-mail lookups fail.
    pub fn with_broken_lookups(mut self) -> Self {
        self.lookups_broken = true;
        self
    }

    pub fn shared(self) -> SharedAuthProvider {
        Arc::new(self)
    }
}

impl AuthProvider for StaticAuthProvider {
    type Error = BoxedError;

    fn authenticate(&self, access_token: &str) -> BoxFuture<'_, Option<AuthUser>, Self::Error> {
        let result = if self.broken {
            Err(fail("auth backend unavailable"))
        } else {
            Ok(self.users.get(access_token).cloned())
        };
        Box::pin(async move { result })
    }

    fn user_email(&self, user_id: &str) -> BoxFuture<'_, Option<String>, Self::Error> {
        let result = if self.broken || self.lookups_broken {
            Err(fail("auth backend unavailable"))
        } else {
            Ok(self
                .users
                .values()
                .find(|user| user.id == user_id)
                .and_then(|user| user.email.clone()))
        };
        Box::pin(async move { result })
    }
}

/// Places provider that replays scripted nearby-search responses in order and
/// records every query it receives.
#[derive(Default)]
pub struct ScriptedPlaces {
    nearby: Mutex<VecDeque<Result<Vec<VenueCandidate>, String>>>,
    open_status: HashMap<String, Result<Option<bool>, String>>,
    text_results: Vec<ResolvedPlace>,
    details: HashMap<String, VenueDetail>,
    queries: Mutex<Vec<NearbyQuery>>,
    open_lookups: Mutex<Vec<String>>,
}

impl ScriptedPlaces {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the response for the next nearby search.
    pub fn then_nearby(self, response: Vec<VenueCandidate>) -> Self {
        self.push_nearby(Ok(response));
        self
    }

    /// Queue a provider failure for the next nearby search.
    pub fn then_nearby_error(self, message: &str) -> Self {
        self.push_nearby(Err(message.to_string()));
        self
    }

    fn push_nearby(&self, response: Result<Vec<VenueCandidate>, String>) {
        if let Ok(mut queue) = self.nearby.lock() {
            queue.push_back(response);
        }
    }

    pub fn with_open_status(mut self, place_id: &str, open: Option<bool>) -> Self {
        self.open_status.insert(place_id.to_string(), Ok(open));
        self
    }

    pub fn with_open_status_error(mut self, place_id: &str) -> Self {
        self.open_status
            .insert(place_id.to_string(), Err("details lookup failed".to_string()));
        self
    }

    pub fn with_text_result(mut self, place: ResolvedPlace) -> Self {
        self.text_results.push(place);
        self
    }

    pub fn with_details(mut self, detail: VenueDetail) -> Self {
        self.details.insert(detail.place_id.clone(), detail);
        self
    }

    /// Nearby queries received so far, in call order.
    pub fn queries(&self) -> Vec<NearbyQuery> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }

    pub fn open_lookups(&self) -> Vec<String> {
        self.open_lookups.lock().map(|l| l.clone()).unwrap_or_default()
    }

    pub fn shared(self: &Arc<Self>) -> SharedPlacesService {
        self.clone()
    }
}

impl PlacesService for ScriptedPlaces {
    type Error = BoxedError;

    fn nearby_search(&self, query: NearbyQuery) -> BoxFuture<'_, Vec<VenueCandidate>, Self::Error> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query);
        }
        let next = self.nearby.lock().ok().and_then(|mut queue| queue.pop_front());
        Box::pin(async move {
            match next {
                Some(Ok(results)) => Ok(results),
                Some(Err(message)) => Err(fail(&message)),
                None => Ok(Vec::new()),
            }
        })
    }

    fn open_now(&self, place_id: &str) -> BoxFuture<'_, Option<bool>, Self::Error> {
        if let Ok(mut lookups) = self.open_lookups.lock() {
            lookups.push(place_id.to_string());
        }
        let status = self.open_status.get(place_id).cloned().unwrap_or(Ok(None));
        Box::pin(async move { status.map_err(|message| fail(&message)) })
    }

    fn text_search(&self, query: &str) -> BoxFuture<'_, Vec<ResolvedPlace>, Self::Error> {
        let results = if query.trim().is_empty() {
            Vec::new()
        } else {
            self.text_results.clone()
        };
        Box::pin(async move { Ok(results) })
    }

    fn place_details(&self, place_id: &str) -> BoxFuture<'_, Option<VenueDetail>, Self::Error> {
        let detail = self.details.get(place_id).cloned();
        Box::pin(async move { Ok(detail) })
    }
}

/// Calendar provider that stores created events in memory.
#[derive(Default)]
pub struct RecordingCalendar {
    events: Mutex<Vec<(String, String, CalendarEvent)>>,
    broken: bool,
}

impl RecordingCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn broken() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            broken: true,
        }
    }

    /// `(access_token, calendar_id, event)` for every event created.
    pub fn events(&self) -> Vec<(String, String, CalendarEvent)> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn shared(self: &Arc<Self>) -> SharedCalendarService {
        self.clone()
    }
}

impl CalendarService for RecordingCalendar {
    type Error = BoxedError;

    fn create_event(
        &self,
        access_token: &str,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
        let result = if self.broken {
            Err(fail("calendar provider rejected the request"))
        } else {
            match self.events.lock() {
                Ok(mut events) => {
                    events.push((access_token.to_string(), calendar_id.to_string(), event));
                    Ok(CalendarEventResult {
                        event_id: Some(format!("evt-{}", events.len())),
                        status: "confirmed".to_string(),
                    })
                }
                Err(_) => Err(fail("poisoned")),
            }
        };
        Box::pin(async move { result })
    }
}
