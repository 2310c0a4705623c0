// --- File: crates/wheretomeet_meetings/src/store.rs ---
//! Meeting record store with per-meeting change notifications.
//!
//! Writes are whole-record: an update is validated against the current record
//! and the complete new record is committed and published. Notifications for
//! one meeting are delivered to every subscriber in commit order.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};
use uuid::Uuid;
use wheretomeet_common::models::{Meeting, MeetingUpdate, TransitionError};
use wheretomeet_common::services::BoxFuture;
use wheretomeet_common::{internal_error, not_found, WhereToMeetError};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Meeting not found")]
    NotFound(Uuid),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("Meeting store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for WhereToMeetError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => not_found("Meeting not found"),
            StoreError::Transition(e) => e.into(),
            StoreError::Unavailable(message) => internal_error(message),
        }
    }
}

/// Persistence plus pub/sub for meeting records.
pub trait MeetingStore: Send + Sync {
    fn insert(&self, meeting: Meeting) -> BoxFuture<'_, Meeting, StoreError>;

    fn get(&self, id: Uuid) -> BoxFuture<'_, Option<Meeting>, StoreError>;

    /// The most recently created meeting of `creator_id`.
    fn latest_for_creator(&self, creator_id: &str) -> BoxFuture<'_, Option<Meeting>, StoreError>;

    /// Validates and commits `update` on behalf of `actor_id`, returning the
    /// committed record.
    fn apply(
        &self,
        id: Uuid,
        actor_id: &str,
        update: MeetingUpdate,
    ) -> BoxFuture<'_, Meeting, StoreError>;

    /// Change notifications for one meeting, released when the returned
    /// guard is dropped.
    fn subscribe(&self, id: Uuid) -> BoxFuture<'_, Subscription, StoreError>;
}

pub type SharedMeetingStore = Arc<dyn MeetingStore>;

type Release = Box<dyn FnOnce(Uuid) + Send + Sync>;

/// A scoped subscription to one meeting's change notifications.
///
/// Dropping it unsubscribes, on every exit path.
pub struct Subscription {
    meeting_id: Uuid,
    receiver: Option<broadcast::Receiver<Meeting>>,
    release: Option<Release>,
}

impl Subscription {
    pub fn new(
        meeting_id: Uuid,
        receiver: broadcast::Receiver<Meeting>,
        release: impl FnOnce(Uuid) + Send + Sync + 'static,
    ) -> Self {
        Self {
            meeting_id,
            receiver: Some(receiver),
            release: Some(Box::new(release)),
        }
    }

    pub fn meeting_id(&self) -> Uuid {
        self.meeting_id
    }

    /// Next committed record, or `None` once the store has shut the channel.
    ///
    /// A subscriber that fell behind skips the records it missed; every
    /// notification carries the whole record, so the next one received is
    /// still authoritative.
    pub async fn recv(&mut self) -> Option<Meeting> {
        let receiver = self.receiver.as_mut()?;
        loop {
            match receiver.recv().await {
                Ok(meeting) => return Some(meeting),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(meeting_id = %self.meeting_id, skipped, "subscriber lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        // The receiver must be gone before the release hook counts receivers.
        drop(self.receiver.take());
        if let Some(release) = self.release.take() {
            release(self.meeting_id);
        }
    }
}

#[derive(Default)]
struct Inner {
    meetings: HashMap<Uuid, (u64, Meeting)>,
    channels: HashMap<Uuid, broadcast::Sender<Meeting>>,
    next_seq: u64,
}

/// Process-local meeting store.
#[derive(Clone)]
pub struct InMemoryMeetingStore {
    inner: Arc<Mutex<Inner>>,
    capacity: usize,
}

impl InMemoryMeetingStore {
    pub fn new(notification_capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            capacity: notification_capacity.max(1),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("meeting store lock poisoned".to_string()))
    }

    /// Number of meetings with at least one live subscriber.
    pub fn active_channels(&self) -> usize {
        self.lock().map(|inner| inner.channels.len()).unwrap_or(0)
    }
}

impl Inner {
    /// Publishing under the store lock keeps notification order equal to commit order.
    fn publish(&self, meeting: &Meeting) {
        if let Some(sender) = self.channels.get(&meeting.id) {
            let delivered = sender.send(meeting.clone()).unwrap_or(0);
            debug!(meeting_id = %meeting.id, status = %meeting.status, delivered, "published meeting change");
        }
    }
}

impl MeetingStore for InMemoryMeetingStore {
    fn insert(&self, meeting: Meeting) -> BoxFuture<'_, Meeting, StoreError> {
        let result = self.lock().map(|mut inner| {
            let seq = inner.next_seq;
            inner.next_seq += 1;
            inner.meetings.insert(meeting.id, (seq, meeting.clone()));
            info!(meeting_id = %meeting.id, creator_id = %meeting.creator_id, "meeting created");
            meeting
        });
        Box::pin(async move { result })
    }

    fn get(&self, id: Uuid) -> BoxFuture<'_, Option<Meeting>, StoreError> {
        let result = self
            .lock()
            .map(|inner| inner.meetings.get(&id).map(|(_, meeting)| meeting.clone()));
        Box::pin(async move { result })
    }

    fn latest_for_creator(&self, creator_id: &str) -> BoxFuture<'_, Option<Meeting>, StoreError> {
        let result = self.lock().map(|inner| {
            inner
                .meetings
                .values()
                .filter(|(_, meeting)| meeting.creator_id == creator_id)
                .max_by_key(|(seq, meeting)| (meeting.created_at, *seq))
                .map(|(_, meeting)| meeting.clone())
        });
        Box::pin(async move { result })
    }

    fn apply(
        &self,
        id: Uuid,
        actor_id: &str,
        update: MeetingUpdate,
    ) -> BoxFuture<'_, Meeting, StoreError> {
        let result = self.lock().and_then(|mut inner| {
            let (_, current) = inner.meetings.get_mut(&id).ok_or(StoreError::NotFound(id))?;
            let kind = update.kind();
            let mut next = current.clone();
            next.apply(actor_id, update)?;
            *current = next.clone();
            info!(meeting_id = %id, update = kind, status = %next.status, "meeting updated");
            inner.publish(&next);
            Ok(next)
        });
        Box::pin(async move { result })
    }

    fn subscribe(&self, id: Uuid) -> BoxFuture<'_, Subscription, StoreError> {
        let capacity = self.capacity;
        let registry = Arc::downgrade(&self.inner);
        let result = self.lock().map(|mut inner| {
            let receiver = inner
                .channels
                .entry(id)
                .or_insert_with(|| broadcast::channel(capacity).0)
                .subscribe();
            debug!(meeting_id = %id, "subscribed to meeting changes");
            Subscription::new(id, receiver, move |meeting_id| {
                let Some(registry) = registry.upgrade() else {
                    return;
                };
                let Ok(mut inner) = registry.lock() else {
                    return;
                };
                let unused = inner
                    .channels
                    .get(&meeting_id)
                    .is_some_and(|sender| sender.receiver_count() == 0);
                if unused {
                    inner.channels.remove(&meeting_id);
                    debug!(meeting_id = %meeting_id, "released meeting channel");
                }
            })
        });
        Box::pin(async move { result })
    }
}
