//! Audit logging for the ledger engine
//!
//! Every mutation is recorded in an append-only JSONL log with the
//! entity's before/after state, written through the store's logger.

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
