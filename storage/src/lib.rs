//! Storage crate: idempotency ledger and audit event log.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – IdempotencyKey, EventLog
//! - [`repository`] – AuditDao trait (the narrow data-access contract)
//! - [`audit_repo`] – AuditRepository (SQLite)
//! - [`sqlite_pool`] – SqlitePoolManager

mod audit_repo;
mod error;
mod models;
mod repository;
mod sqlite_pool;


pub use audit_repo::AuditRepository;
pub use error::StorageError;
pub use models::{EventLog, IdempotencyKey};
pub use repository::AuditDao;
pub use sqlite_pool::SqlitePoolManager;
