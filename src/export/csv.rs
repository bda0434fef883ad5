//! CSV export
//!
//! Spreadsheet-friendly listings with entity ids resolved to names.
//! Stale references render as "Unknown" rather than failing the export.

use std::collections::HashMap;
use std::io::Write;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Money, TransactionKind};
use crate::storage::LedgerStore;

/// Export every transaction as CSV, newest date first
pub fn export_transactions_csv<W: Write>(
    store: &LedgerStore,
    writer: &mut W,
) -> LedgerResult<()> {
    let account_names: HashMap<_, _> = store
        .accounts
        .get_all()?
        .into_iter()
        .map(|a| (a.id, a.name))
        .collect();
    let envelope_names: HashMap<_, _> = store
        .envelopes
        .get_all()?
        .into_iter()
        .map(|e| (e.id, e.name))
        .collect();
    let payee_names: HashMap<_, _> = store
        .payees
        .get_all()?
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect();

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record([
            "ID",
            "Date",
            "Account",
            "Payee",
            "Envelope",
            "Description",
            "Amount",
            "Kind",
            "Is Transfer",
        ])
        .map_err(|e| LedgerError::Export(e.to_string()))?;

    for txn in store.transactions.get_all()? {
        let account = account_names
            .get(&txn.account_id)
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string());
        let payee = payee_names
            .get(&txn.payee_id)
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string());
        let envelope = match txn.envelope_id {
            Some(id) => envelope_names
                .get(&id)
                .cloned()
                .unwrap_or_else(|| "Unknown".to_string()),
            None => String::new(),
        };
        let kind = match txn.kind {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        };

        csv_writer
            .write_record([
                txn.id.to_string(),
                txn.date.format("%Y-%m-%d").to_string(),
                account,
                payee,
                envelope,
                txn.description.clone(),
                decimal(txn.signed_amount()),
                kind.to_string(),
                txn.is_transfer.to_string(),
            ])
            .map_err(|e| LedgerError::Export(e.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|e| LedgerError::Export(e.to_string()))?;
    Ok(())
}

/// Export every envelope as CSV, in display order
pub fn export_envelopes_csv<W: Write>(store: &LedgerStore, writer: &mut W) -> LedgerResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(["ID", "Name", "Category", "Budget", "Due Day", "Order"])
        .map_err(|e| LedgerError::Export(e.to_string()))?;

    for envelope in store.envelopes.get_all()? {
        csv_writer
            .write_record([
                envelope.id.to_string(),
                envelope.name,
                envelope.category,
                decimal(envelope.budget),
                envelope
                    .due_day
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
                envelope.order_index.to_string(),
            ])
            .map_err(|e| LedgerError::Export(e.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|e| LedgerError::Export(e.to_string()))?;
    Ok(())
}

/// Signed decimal rendering without a currency symbol
fn decimal(amount: Money) -> String {
    format!("{:.2}", amount.cents() as f64 / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LedgerPaths;
    use crate::models::{Account, Envelope, Payee, Transaction};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, LedgerStore) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let store = LedgerStore::open(paths).unwrap();
        store.load_all().unwrap();
        (temp_dir, store)
    }

    #[test]
    fn test_transactions_csv() {
        let (_temp_dir, store) = create_test_store();

        let account = Account::new("Checking");
        let payee = Payee::new("Corner Market");
        let envelope = Envelope::new("Groceries", "Living", Money::from_cents(20000));
        let mut txn = Transaction::new(
            account.id,
            payee.id,
            Money::from_cents(5000),
            TransactionKind::Expense,
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        );
        txn.envelope_id = Some(envelope.id);
        txn.description = "weekly shop".into();

        store.accounts.upsert(account).unwrap();
        store.payees.upsert(payee).unwrap();
        store.envelopes.upsert(envelope).unwrap();
        store.transactions.insert(txn).unwrap();

        let mut buffer = Vec::new();
        export_transactions_csv(&store, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.starts_with("ID,Date,Account,Payee,Envelope,Description,Amount,Kind,Is Transfer"));
        assert!(text.contains("2025-01-15,Checking,Corner Market,Groceries,weekly shop,-50.00,expense,false"));
    }

    #[test]
    fn test_stale_references_render_unknown() {
        let (_temp_dir, store) = create_test_store();

        let txn = Transaction::new(
            crate::models::AccountId::new(),
            crate::models::PayeeId::new(),
            Money::from_cents(100),
            TransactionKind::Income,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        );
        store.transactions.insert(txn).unwrap();

        let mut buffer = Vec::new();
        export_transactions_csv(&store, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("Unknown,Unknown"));
    }

    #[test]
    fn test_envelopes_csv() {
        let (_temp_dir, store) = create_test_store();

        let mut envelope = Envelope::new("Rent", "Housing", Money::from_cents(120000));
        envelope.due_day = Some(1);
        store.envelopes.upsert(envelope).unwrap();

        let mut buffer = Vec::new();
        export_envelopes_csv(&store, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.contains("Rent,Housing,1200.00,1,0"));
    }
}
