// --- File: crates/wheretomeet_meetings/src/session.rs ---
//! Per-view meeting session state.
//!
//! [`MeetingSession`] holds one view's copy of a meeting plus its current
//! recommendations. It performs no I/O: callers feed it committed records and
//! search results, and it answers with the [`SessionAction`]s to carry out.
//! Searches are tagged with a generation so that only the most recently
//! started one can ever land.

use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;
use wheretomeet_common::models::{LatLng, Meeting, MeetingStatus, VenueCandidate};
use wheretomeet_places::{midpoint, VenueSearchOutcome};

pub const NOTICE_VENUE_CHOSEN: &str = "Meeting location has been chosen!";

/// What a session pushes to its view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum SessionEvent {
    Meeting(Meeting),
    Recommendations(Vec<VenueCandidate>),
    Notice(String),
}

impl SessionEvent {
    /// Event name used on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::Meeting(_) => "meeting",
            SessionEvent::Recommendations(_) => "recommendations",
            SessionEvent::Notice(_) => "notice",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    /// Run a venue search around `center` and report back with `generation`.
    StartSearch { generation: u64, center: LatLng },
    Emit(SessionEvent),
}

#[derive(Debug)]
pub struct MeetingSession {
    meeting_id: Uuid,
    meeting: Option<Meeting>,
    recommendations: Vec<VenueCandidate>,
    generation: u64,
    in_flight: bool,
    searched_pair: Option<(LatLng, LatLng)>,
    live: bool,
}

impl MeetingSession {
    pub fn new(meeting_id: Uuid) -> Self {
        Self {
            meeting_id,
            meeting: None,
            recommendations: Vec::new(),
            generation: 0,
            in_flight: false,
            searched_pair: None,
            live: true,
        }
    }

    pub fn meeting(&self) -> Option<&Meeting> {
        self.meeting.as_ref()
    }

    pub fn recommendations(&self) -> &[VenueCandidate] {
        &self.recommendations
    }

    pub fn search_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Takes in a committed record.
    ///
    /// Records for other meetings, exact duplicates and status regressions
    /// are ignored. Anything else replaces the local copy as a whole.
    pub fn apply_record(&mut self, record: Meeting) -> Vec<SessionAction> {
        if !self.live || record.id != self.meeting_id {
            return Vec::new();
        }

        let previous_status = match &self.meeting {
            Some(current) if *current == record => return Vec::new(),
            Some(current) if record.status < current.status => {
                warn!(
                    meeting_id = %record.id,
                    local = %current.status,
                    incoming = %record.status,
                    "dropping stale meeting record"
                );
                return Vec::new();
            }
            Some(current) => Some(current.status),
            None => None,
        };

        let status = record.status;
        let pair = record.coordinate_pair();
        self.meeting = Some(record.clone());
        let mut actions = vec![SessionAction::Emit(SessionEvent::Meeting(record))];

        match status {
            MeetingStatus::Pending => {}
            MeetingStatus::Active => {
                // A search runs once per distinct pair of locations; repeated
                // notifications for the same pair start nothing.
                if let Some(pair) = pair {
                    if self.searched_pair != Some(pair) {
                        self.searched_pair = Some(pair);
                        actions.push(self.start_search(pair));
                    }
                }
            }
            MeetingStatus::Completed => {
                self.in_flight = false;
                if !self.recommendations.is_empty() {
                    self.recommendations.clear();
                    actions.push(SessionAction::Emit(SessionEvent::Recommendations(Vec::new())));
                }
                if previous_status.is_some_and(|s| s != MeetingStatus::Completed) {
                    actions.push(SessionAction::Emit(SessionEvent::Notice(
                        NOTICE_VENUE_CHOSEN.to_string(),
                    )));
                }
            }
        }
        actions
    }

    /// Starts a fresh search for the current pair, superseding any in flight.
    /// Only meaningful while the meeting is active.
    pub fn refresh(&mut self) -> Vec<SessionAction> {
        if !self.live {
            return Vec::new();
        }
        let pair = self
            .meeting
            .as_ref()
            .filter(|m| m.status == MeetingStatus::Active)
            .and_then(Meeting::coordinate_pair);
        match pair {
            Some(pair) => vec![self.start_search(pair)],
            None => Vec::new(),
        }
    }

    fn start_search(&mut self, (a, b): (LatLng, LatLng)) -> SessionAction {
        self.generation += 1;
        self.in_flight = true;
        debug!(meeting_id = %self.meeting_id, generation = self.generation, "starting venue search");
        SessionAction::StartSearch {
            generation: self.generation,
            center: midpoint(a, b),
        }
    }

    /// Lands a search result. Results from superseded searches, or arriving
    /// after the meeting left `active` or the session was torn down, are dropped.
    pub fn apply_search(&mut self, generation: u64, outcome: VenueSearchOutcome) -> Vec<SessionAction> {
        if !self.live || generation != self.generation {
            debug!(
                meeting_id = %self.meeting_id,
                generation,
                current = self.generation,
                "discarding superseded search result"
            );
            return Vec::new();
        }
        self.in_flight = false;

        let active = self
            .meeting
            .as_ref()
            .is_some_and(|m| m.status == MeetingStatus::Active);
        if !active {
            debug!(meeting_id = %self.meeting_id, "discarding search result for inactive meeting");
            return Vec::new();
        }

        self.recommendations = outcome.candidates.clone();
        let mut actions = vec![SessionAction::Emit(SessionEvent::Recommendations(
            outcome.candidates,
        ))];
        if let Some(notice) = outcome.notice {
            actions.push(SessionAction::Emit(SessionEvent::Notice(notice)));
        }
        actions
    }

    /// Ends the session. Nothing that arrives afterwards has any effect.
    pub fn teardown(&mut self) {
        self.live = false;
        self.in_flight = false;
    }
}
