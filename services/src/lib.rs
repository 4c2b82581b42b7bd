//! # services
//!
//! Stores used by conversation flows:
//!
//! - [`SessionStore`] – short-lived per-user key/value state for multi-step flows. Process memory only.
//! - [`UserStore`] – durable user profiles kept in one JSON file, rewritten on every upsert.

mod error;
mod session_store;
mod user_store;

pub use error::StoreError;
pub use session_store::{Session, SessionStore};
pub use user_store::{UserProfile, UserStore};
