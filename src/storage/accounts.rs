//! Account repository
//!
//! In-memory account collection with JSON file load/save.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::LedgerError;
use crate::models::{Account, AccountId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct AccountData {
    accounts: Vec<Account>,
}

/// Repository for account persistence
pub struct AccountRepository {
    path: PathBuf,
    data: RwLock<HashMap<AccountId, Account>>,
}

impl AccountRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load accounts from disk
    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: AccountData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for account in file_data.accounts {
            data.insert(account.id, account);
        }
        Ok(())
    }

    /// Save accounts to disk
    pub fn save(&self) -> Result<(), LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut accounts: Vec<_> = data.values().cloned().collect();
        accounts.sort_by(|a, b| a.name.cmp(&b.name));

        write_json_atomic(&self.path, &AccountData { accounts })
    }

    /// Get an account by ID
    pub fn get(&self, id: AccountId) -> Result<Option<Account>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.get(&id).cloned())
    }

    /// Get all accounts, sorted by name
    pub fn get_all(&self) -> Result<Vec<Account>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut accounts: Vec<_> = data.values().cloned().collect();
        accounts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(accounts)
    }

    /// Get an account by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Result<Option<Account>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let needle = name.to_lowercase();
        Ok(data
            .values()
            .find(|a| a.name.to_lowercase() == needle)
            .cloned())
    }

    /// Insert or update an account
    pub fn upsert(&self, account: Account) -> Result<(), LedgerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        data.insert(account.id, account);
        Ok(())
    }

    /// Check if an account exists
    pub fn exists(&self, id: AccountId) -> Result<bool, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.contains_key(&id))
    }

    /// Check if an account name is taken, optionally excluding one account
    pub fn name_exists(
        &self,
        name: &str,
        exclude_id: Option<AccountId>,
    ) -> Result<bool, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let needle = name.to_lowercase();
        Ok(data
            .values()
            .any(|a| a.name.to_lowercase() == needle && Some(a.id) != exclude_id))
    }

    /// Count accounts
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
    use crate::models::Money;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, AccountRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = AccountRepository::new(temp_dir.path().join("accounts.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_upsert_and_get() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let account = Account::with_opening("Checking", Money::from_cents(100000));
        let id = account.id;
        repo.upsert(account).unwrap();

        let fetched = repo.get(id).unwrap().unwrap();
        assert_eq!(fetched.name, "Checking");
        assert!(repo.exists(id).unwrap());
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let account = Account::new("Savings");
        let id = account.id;
        repo.upsert(account).unwrap();
        repo.save().unwrap();

        let repo2 = AccountRepository::new(temp_dir.path().join("accounts.json"));
        repo2.load().unwrap();
        assert_eq!(repo2.get(id).unwrap().unwrap().name, "Savings");
    }

    #[test]
    fn test_get_by_name() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        repo.upsert(Account::new("My Checking")).unwrap();

        assert!(repo.get_by_name("my checking").unwrap().is_some());
        assert!(repo.get_by_name("other").unwrap().is_none());
    }

    #[test]
    fn test_name_exists() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let account = Account::new("Wallet");
        let id = account.id;
        repo.upsert(account).unwrap();

        assert!(repo.name_exists("wallet", None).unwrap());
        assert!(!repo.name_exists("wallet", Some(id)).unwrap());
        assert!(!repo.name_exists("other", None).unwrap());
    }
}
