// --- File: crates/wheretomeet_meetings/src/lib.rs ---
pub mod doc;
pub mod driver;
pub mod handlers;
pub mod routes;
pub mod session;
#[cfg(test)]
mod session_test;
pub mod store;

pub use driver::SessionDriver;
pub use handlers::MeetingsState;
pub use session::{MeetingSession, SessionAction, SessionEvent};
pub use store::{InMemoryMeetingStore, MeetingStore, SharedMeetingStore, StoreError, Subscription};
