//! JSON full-ledger export

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Account, Envelope, MonthlyAllocation, Payee, Transaction};
use crate::storage::LedgerStore;

/// Version stamp written into every export
pub const EXPORT_SCHEMA_VERSION: u32 = 1;

/// A complete snapshot of the ledger's collections
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    pub schema_version: u32,
    pub accounts: Vec<Account>,
    pub envelopes: Vec<Envelope>,
    pub payees: Vec<Payee>,
    pub transactions: Vec<Transaction>,
    pub allocations: Vec<MonthlyAllocation>,
    pub category_order: Vec<String>,
}

impl FullExport {
    /// Snapshot every collection of the store
    pub fn snapshot(store: &LedgerStore) -> LedgerResult<Self> {
        let mut allocations = Vec::new();
        for envelope in store.envelopes.get_all()? {
            allocations.extend(store.allocations.get_for_envelope(envelope.id)?);
        }

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION,
            accounts: store.accounts.get_all()?,
            envelopes: store.envelopes.get_all()?,
            payees: store.payees.get_all()?,
            transactions: store.transactions.get_all()?,
            allocations,
            category_order: store.ordering.get()?,
        })
    }
}

/// Write the full ledger as pretty-printed JSON
pub fn export_full_json<W: Write>(store: &LedgerStore, writer: &mut W) -> LedgerResult<()> {
    let export = FullExport::snapshot(store)?;
    serde_json::to_writer_pretty(writer, &export)
        .map_err(|e| LedgerError::Export(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LedgerPaths;
    use crate::models::Money;
    use tempfile::TempDir;

    #[test]
    fn test_export_roundtrips() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let store = LedgerStore::open(paths).unwrap();
        store.load_all().unwrap();

        store
            .accounts
            .upsert(Account::with_opening("Checking", Money::from_cents(1000)))
            .unwrap();
        store
            .envelopes
            .upsert(Envelope::new("Groceries", "Living", Money::from_cents(20000)))
            .unwrap();

        let mut buffer = Vec::new();
        export_full_json(&store, &mut buffer).unwrap();

        let parsed: FullExport = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed.schema_version, EXPORT_SCHEMA_VERSION);
        assert_eq!(parsed.accounts.len(), 1);
        assert_eq!(parsed.envelopes.len(), 1);
        assert!(parsed.transactions.is_empty());
    }
}
