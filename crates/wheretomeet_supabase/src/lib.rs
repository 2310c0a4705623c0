// --- File: crates/wheretomeet_supabase/src/lib.rs ---
pub mod client;

pub use client::{SupabaseAuthProvider, SupabaseError};
