//! Ledger store
//!
//! Owns the four base collections (accounts, envelopes, payees,
//! transactions) and the two auxiliary collections (monthly allocations,
//! category ordering) as in-memory repositories backed by JSON files.
//! The store holds no business rules; services borrow it for lookups and
//! writes. A store is a plain injected value, so independent ledgers can
//! coexist (tests open one per temp dir).

pub mod accounts;
pub mod allocations;
pub mod envelopes;
pub mod file_io;
pub mod ordering;
pub mod payees;
pub mod transactions;

pub use accounts::AccountRepository;
pub use allocations::AllocationRepository;
pub use envelopes::EnvelopeRepository;
pub use file_io::{read_json, write_json_atomic};
pub use ordering::OrderingRepository;
pub use payees::PayeeRepository;
pub use transactions::TransactionRepository;

use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::LedgerPaths;
use crate::error::LedgerError;

/// Storage coordinator holding every collection plus the audit log
pub struct LedgerStore {
    paths: LedgerPaths,
    audit: AuditLogger,
    ready: AtomicBool,
    pub accounts: AccountRepository,
    pub envelopes: EnvelopeRepository,
    pub payees: PayeeRepository,
    pub transactions: TransactionRepository,
    pub allocations: AllocationRepository,
    pub ordering: OrderingRepository,
}

impl LedgerStore {
    /// Create a store rooted at the given paths
    pub fn open(paths: LedgerPaths) -> Result<Self, LedgerError> {
        paths.ensure_directories()?;

        Ok(Self {
            accounts: AccountRepository::new(paths.accounts_file()),
            envelopes: EnvelopeRepository::new(paths.envelopes_file()),
            payees: PayeeRepository::new(paths.payees_file()),
            transactions: TransactionRepository::new(paths.transactions_file()),
            allocations: AllocationRepository::new(paths.allocations_file()),
            ordering: OrderingRepository::new(paths.ordering_file()),
            audit: AuditLogger::new(paths.audit_log()),
            ready: AtomicBool::new(false),
            paths,
        })
    }

    /// The paths configuration
    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }

    /// Load every collection from disk; the store is ready only after
    /// this completes
    pub fn load_all(&self) -> Result<(), LedgerError> {
        self.accounts.load()?;
        self.envelopes.load()?;
        self.payees.load()?;
        self.transactions.load()?;
        self.allocations.load()?;
        self.ordering.load()?;
        self.ready.store(true, AtomicOrdering::Release);
        Ok(())
    }

    /// Save every collection to disk
    pub fn save_all(&self) -> Result<(), LedgerError> {
        self.accounts.save()?;
        self.envelopes.save()?;
        self.payees.save()?;
        self.transactions.save()?;
        self.allocations.save()?;
        self.ordering.save()?;
        Ok(())
    }

    /// Whether the initial load has completed
    pub fn is_ready(&self) -> bool {
        self.ready.load(AtomicOrdering::Acquire)
    }

    /// The audit log reader
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Record a create in the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), LedgerError> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    /// Record an update in the audit log
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> Result<(), LedgerError> {
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff_summary,
        ))
    }

    /// Record a delete in the audit log
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), LedgerError> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Account;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let store = LedgerStore::open(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(!store.is_ready());
    }

    #[test]
    fn test_ready_after_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let store = LedgerStore::open(paths).unwrap();

        store.load_all().unwrap();
        assert!(store.is_ready());
    }

    #[test]
    fn test_save_and_reload_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let store = LedgerStore::open(paths.clone()).unwrap();
        store.load_all().unwrap();

        let account = Account::new("Checking");
        let id = account.id;
        store.accounts.upsert(account).unwrap();
        store.save_all().unwrap();

        let store2 = LedgerStore::open(paths).unwrap();
        store2.load_all().unwrap();
        assert!(store2.accounts.exists(id).unwrap());
    }

    #[test]
    fn test_audit_helpers_append() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let store = LedgerStore::open(paths).unwrap();
        store.load_all().unwrap();

        let account = Account::new("Checking");
        store
            .log_create(
                EntityType::Account,
                account.id.to_string(),
                Some(account.name.clone()),
                &account,
            )
            .unwrap();

        let entries = store.audit().read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entity_type, EntityType::Account);
    }
}
