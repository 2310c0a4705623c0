// --- File: crates/wheretomeet_places/src/lib.rs ---
pub mod client;
pub mod doc;
pub mod handlers;
pub mod logic;
#[cfg(test)]
mod logic_proptest;
pub mod routes;
#[cfg(test)]
mod routes_test;

pub use client::{GooglePlacesClient, PlacesError};
pub use logic::{midpoint, search_venues, VenueSearchOutcome};
