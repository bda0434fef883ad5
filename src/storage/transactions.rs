//! Transaction repository
//!
//! The collection is kept sorted by date descending at all times, with
//! ties broken by insertion order, so every listing is already in
//! register order.

use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::error::LedgerError;
use crate::models::{AccountId, EnvelopeId, Transaction, TransactionId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

/// Repository for transaction persistence
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<Vec<Transaction>>,
}

impl TransactionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    /// Load transactions from disk
    ///
    /// The stored order is preserved for equal dates, so ties keep their
    /// original insertion order across restarts.
    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: TransactionData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        *data = file_data.transactions;
        data.sort_by(|a, b| b.date.cmp(&a.date)); // stable sort keeps tie order
        Ok(())
    }

    /// Save transactions to disk
    pub fn save(&self) -> Result<(), LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        write_json_atomic(
            &self.path,
            &TransactionData {
                transactions: data.clone(),
            },
        )
    }

    /// Insert a transaction at its sorted position
    ///
    /// Placed after any existing transactions with the same date.
    pub fn insert(&self, transaction: Transaction) -> Result<(), LedgerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let pos = data
            .iter()
            .position(|t| t.date < transaction.date)
            .unwrap_or(data.len());
        data.insert(pos, transaction);
        Ok(())
    }

    /// Replace a transaction by id
    ///
    /// Re-sorts only when the date changed; otherwise the row keeps its
    /// position among same-date transactions.
    pub fn replace(&self, transaction: Transaction) -> Result<bool, LedgerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let Some(idx) = data.iter().position(|t| t.id == transaction.id) else {
            return Ok(false);
        };

        if data[idx].date == transaction.date {
            data[idx] = transaction;
        } else {
            data.remove(idx);
            let pos = data
                .iter()
                .position(|t| t.date < transaction.date)
                .unwrap_or(data.len());
            data.insert(pos, transaction);
        }
        Ok(true)
    }

    /// Remove a transaction by id, returning it if present
    pub fn remove(&self, id: TransactionId) -> Result<Option<Transaction>, LedgerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let idx = data.iter().position(|t| t.id == id);
        Ok(idx.map(|i| data.remove(i)))
    }

    /// Get a transaction by id
    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.iter().find(|t| t.id == id).cloned())
    }

    /// All transactions in register order (date descending)
    pub fn get_all(&self) -> Result<Vec<Transaction>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.clone())
    }

    /// Transactions posting to one account
    pub fn get_by_account(&self, account_id: AccountId) -> Result<Vec<Transaction>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data
            .iter()
            .filter(|t| t.account_id == account_id)
            .cloned()
            .collect())
    }

    /// Transactions classified under one envelope
    pub fn get_by_envelope(&self, envelope_id: EnvelopeId) -> Result<Vec<Transaction>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data
            .iter()
            .filter(|t| t.envelope_id == Some(envelope_id))
            .cloned()
            .collect())
    }

    /// Transactions dated within an inclusive range
    pub fn get_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data
            .iter()
            .filter(|t| t.date >= start && t.date <= end)
            .cloned()
            .collect())
    }

    /// Count transactions
    pub fn count(&self) -> Result<usize, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, PayeeId, TransactionKind};
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, TransactionRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = TransactionRepository::new(temp_dir.path().join("transactions.json"));
        (temp_dir, repo)
    }

    fn txn_on(day: u32) -> Transaction {
        Transaction::new(
            AccountId::new(),
            PayeeId::new(),
            Money::from_cents(1000),
            TransactionKind::Expense,
            NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
        )
    }

    #[test]
    fn test_insert_keeps_date_descending() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        repo.insert(txn_on(10)).unwrap();
        repo.insert(txn_on(20)).unwrap();
        repo.insert(txn_on(15)).unwrap();

        let days: Vec<u32> = repo
            .get_all()
            .unwrap()
            .iter()
            .map(|t| t.date.format("%d").to_string().parse().unwrap())
            .collect();
        assert_eq!(days, vec![20, 15, 10]);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let first = txn_on(10);
        let second = txn_on(10);
        let first_id = first.id;
        let second_id = second.id;

        repo.insert(first).unwrap();
        repo.insert(second).unwrap();

        let all = repo.get_all().unwrap();
        assert_eq!(all[0].id, first_id);
        assert_eq!(all[1].id, second_id);
    }

    #[test]
    fn test_replace_resorts_on_date_change() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let mut txn = txn_on(10);
        let id = txn.id;
        repo.insert(txn.clone()).unwrap();
        repo.insert(txn_on(20)).unwrap();

        txn.date = NaiveDate::from_ymd_opt(2025, 1, 25).unwrap();
        assert!(repo.replace(txn).unwrap());

        let all = repo.get_all().unwrap();
        assert_eq!(all[0].id, id);
    }

    #[test]
    fn test_replace_missing_returns_false() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert!(!repo.replace(txn_on(1)).unwrap());
    }

    #[test]
    fn test_remove() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let txn = txn_on(5);
        let id = txn.id;
        repo.insert(txn).unwrap();

        let removed = repo.remove(id).unwrap();
        assert!(removed.is_some());
        assert_eq!(repo.count().unwrap(), 0);
        assert!(repo.remove(id).unwrap().is_none());
    }

    #[test]
    fn test_filters() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let account = AccountId::new();
        let envelope = EnvelopeId::new();

        let mut a = txn_on(5);
        a.account_id = account;
        a.envelope_id = Some(envelope);
        repo.insert(a).unwrap();
        repo.insert(txn_on(12)).unwrap();

        assert_eq!(repo.get_by_account(account).unwrap().len(), 1);
        assert_eq!(repo.get_by_envelope(envelope).unwrap().len(), 1);
        assert_eq!(
            repo.get_in_range(
                NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
            )
            .unwrap()
            .len(),
            1
        );
    }

    #[test]
    fn test_save_and_reload_preserves_order() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        repo.insert(txn_on(10)).unwrap();
        repo.insert(txn_on(10)).unwrap();
        repo.insert(txn_on(20)).unwrap();
        let order_before: Vec<TransactionId> =
            repo.get_all().unwrap().iter().map(|t| t.id).collect();
        repo.save().unwrap();

        let repo2 = TransactionRepository::new(temp_dir.path().join("transactions.json"));
        repo2.load().unwrap();
        let order_after: Vec<TransactionId> =
            repo2.get_all().unwrap().iter().map(|t| t.id).collect();
        assert_eq!(order_before, order_after);
    }
}
