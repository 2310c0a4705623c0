// --- File: crates/wheretomeet_gcal/src/lib.rs ---
pub mod auth;
pub mod client;
pub mod doc;
pub mod handlers;
pub mod logic;
#[cfg(test)]
mod logic_proptest;
#[cfg(test)]
mod logic_test;
pub mod routes;
pub mod service;

pub use client::{ScheduleError, ScheduleForm, ScheduleOutcome, SchedulingClient};
pub use service::{GcalServiceError, GoogleCalendarService};
