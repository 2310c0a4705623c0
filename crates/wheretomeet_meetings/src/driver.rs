// --- File: crates/wheretomeet_meetings/src/driver.rs ---
//! Runs a [`MeetingSession`] against the store and the places provider.
//!
//! One driver serves one view. It subscribes before reading the current
//! record so that no commit can slip between the two, then reacts to
//! notifications and search completions on a single task until the view
//! goes away.

use std::future::Future;
use std::pin::Pin;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info};
use uuid::Uuid;
use wheretomeet_common::models::LatLng;
use wheretomeet_common::services::SharedPlacesService;
use wheretomeet_places::{search_venues, VenueSearchOutcome};

use crate::session::{MeetingSession, SessionAction, SessionEvent};
use crate::store::{SharedMeetingStore, StoreError};

pub const NOTICE_SEARCH_UNAVAILABLE: &str = "Venue search is not available.";

type SearchFuture = Pin<Box<dyn Future<Output = (u64, VenueSearchOutcome)> + Send>>;

#[derive(Clone)]
pub struct SessionDriver {
    store: SharedMeetingStore,
    places: Option<SharedPlacesService>,
    retries: Option<broadcast::Sender<Uuid>>,
}

impl SessionDriver {
    pub fn new(store: SharedMeetingStore, places: Option<SharedPlacesService>) -> Self {
        Self {
            store,
            places,
            retries: None,
        }
    }

    /// Listen for manual search retries. Each id sent on `retries` reruns the
    /// search of the sessions for that meeting.
    pub fn with_retries(mut self, retries: broadcast::Sender<Uuid>) -> Self {
        self.retries = Some(retries);
        self
    }

    /// Drives the session for `meeting_id`, pushing events into `events`
    /// until the receiving side is dropped or the store closes the channel.
    ///
    /// The subscription is released on every return path.
    pub async fn run(
        self,
        meeting_id: Uuid,
        events: mpsc::Sender<SessionEvent>,
    ) -> Result<(), StoreError> {
        let mut subscription = self.store.subscribe(meeting_id).await?;
        let initial = self
            .store
            .get(meeting_id)
            .await?
            .ok_or(StoreError::NotFound(meeting_id))?;

        let mut retries = self.retries.as_ref().map(broadcast::Sender::subscribe);
        let mut session = MeetingSession::new(meeting_id);
        let mut searches: FuturesUnordered<SearchFuture> = FuturesUnordered::new();
        info!(meeting_id = %meeting_id, "meeting session started");

        let actions = session.apply_record(initial);
        let mut open = self.dispatch(actions, &events, &mut searches).await;

        while open {
            open = tokio::select! {
                _ = events.closed() => false,
                next = subscription.recv() => match next {
                    Some(record) => {
                        let actions = session.apply_record(record);
                        self.dispatch(actions, &events, &mut searches).await
                    }
                    None => false,
                },
                Some((generation, outcome)) = searches.next(), if !searches.is_empty() => {
                    let actions = session.apply_search(generation, outcome);
                    self.dispatch(actions, &events, &mut searches).await
                }
                _ = next_retry(&mut retries, meeting_id) => {
                    debug!(meeting_id = %meeting_id, "venue search retry");
                    let actions = session.refresh();
                    self.dispatch(actions, &events, &mut searches).await
                }
            };
        }

        session.teardown();
        info!(meeting_id = %meeting_id, "meeting session ended");
        Ok(())
    }

    /// Carries out `actions`. Returns `false` once the view is gone.
    async fn dispatch(
        &self,
        actions: Vec<SessionAction>,
        events: &mpsc::Sender<SessionEvent>,
        searches: &mut FuturesUnordered<SearchFuture>,
    ) -> bool {
        for action in actions {
            match action {
                SessionAction::Emit(event) => {
                    debug!(event = event.name(), "emitting session event");
                    if events.send(event).await.is_err() {
                        return false;
                    }
                }
                SessionAction::StartSearch { generation, center } => {
                    searches.push(self.search(generation, center));
                }
            }
        }
        true
    }

    fn search(&self, generation: u64, center: LatLng) -> SearchFuture {
        match self.places.clone() {
            Some(places) => Box::pin(async move {
                (generation, search_venues(places.as_ref(), center).await)
            }),
            None => Box::pin(async move {
                let outcome = VenueSearchOutcome {
                    candidates: Vec::new(),
                    notice: Some(NOTICE_SEARCH_UNAVAILABLE.to_string()),
                };
                (generation, outcome)
            }),
        }
    }
}

/// Resolves on the next retry request for `meeting_id`. Never resolves once
/// there is nothing left to listen to.
async fn next_retry(retries: &mut Option<broadcast::Receiver<Uuid>>, meeting_id: Uuid) {
    if let Some(receiver) = retries.as_mut() {
        loop {
            match receiver.recv().await {
                Ok(id) if id == meeting_id => return,
                Ok(_) => continue,
                // A retry may be among the skipped messages.
                Err(broadcast::error::RecvError::Lagged(_)) => return,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }
    std::future::pending::<()>().await
}
