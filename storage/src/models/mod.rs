//! Persistence models for the idempotency ledger and audit log.

mod event_log;
mod idempotency_key;

pub use event_log::EventLog;
pub use idempotency_key::IdempotencyKey;
