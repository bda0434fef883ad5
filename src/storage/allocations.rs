//! Monthly allocation repository
//!
//! Overrides are keyed by (envelope, month); at most one per pair.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::LedgerError;
use crate::models::{EnvelopeId, Month, MonthlyAllocation};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct AllocationData {
    #[serde(default)]
    allocations: Vec<MonthlyAllocation>,
}

/// Repository for monthly allocation overrides
pub struct AllocationRepository {
    path: PathBuf,
    data: RwLock<HashMap<(EnvelopeId, Month), MonthlyAllocation>>,
}

impl AllocationRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load allocations from disk
    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: AllocationData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for alloc in file_data.allocations {
            data.insert((alloc.envelope_id, alloc.month), alloc);
        }
        Ok(())
    }

    /// Save allocations to disk
    pub fn save(&self) -> Result<(), LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut allocations: Vec<_> = data.values().cloned().collect();
        allocations.sort_by_key(|a| (a.month, a.envelope_id.to_string()));

        write_json_atomic(&self.path, &AllocationData { allocations })
    }

    /// Get the override for an envelope and month
    pub fn get(
        &self,
        envelope_id: EnvelopeId,
        month: Month,
    ) -> Result<Option<MonthlyAllocation>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.get(&(envelope_id, month)).cloned())
    }

    /// All overrides for one month
    pub fn get_for_month(&self, month: Month) -> Result<Vec<MonthlyAllocation>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data
            .values()
            .filter(|a| a.month == month)
            .cloned()
            .collect())
    }

    /// All overrides for one envelope, in month order
    pub fn get_for_envelope(
        &self,
        envelope_id: EnvelopeId,
    ) -> Result<Vec<MonthlyAllocation>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = data
            .values()
            .filter(|a| a.envelope_id == envelope_id)
            .cloned()
            .collect();
        list.sort_by_key(|a| a.month);
        Ok(list)
    }

    /// Insert or update an override
    pub fn upsert(&self, allocation: MonthlyAllocation) -> Result<(), LedgerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        data.insert((allocation.envelope_id, allocation.month), allocation);
        Ok(())
    }

    /// Remove an override
    pub fn remove(&self, envelope_id: EnvelopeId, month: Month) -> Result<bool, LedgerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        Ok(data.remove(&(envelope_id, month)).is_some())
    }

    /// Remove every override for an envelope, returning how many were dropped
    pub fn remove_for_envelope(&self, envelope_id: EnvelopeId) -> Result<usize, LedgerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let before = data.len();
        data.retain(|(env, _), _| *env != envelope_id);
        Ok(before - data.len())
    }

    /// Count overrides
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

    fn create_test_repo() -> (TempDir, AllocationRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = AllocationRepository::new(temp_dir.path().join("allocations.json"));
        (temp_dir, repo)
    }

    fn month(m: u32) -> Month {
        Month::new(2025, m).unwrap()
    }

    #[test]
    fn test_upsert_and_get() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let env = EnvelopeId::new();
        repo.upsert(MonthlyAllocation::new(env, month(1), Money::from_cents(5000)))
            .unwrap();

        let found = repo.get(env, month(1)).unwrap().unwrap();
        assert_eq!(found.amount.cents(), 5000);
        assert!(repo.get(env, month(2)).unwrap().is_none());
    }

    #[test]
    fn test_get_for_month_and_envelope() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let env1 = EnvelopeId::new();
        let env2 = EnvelopeId::new();
        repo.upsert(MonthlyAllocation::new(env1, month(1), Money::from_cents(100)))
            .unwrap();
        repo.upsert(MonthlyAllocation::new(env2, month(1), Money::from_cents(200)))
            .unwrap();
        repo.upsert(MonthlyAllocation::new(env1, month(3), Money::from_cents(300)))
            .unwrap();

        assert_eq!(repo.get_for_month(month(1)).unwrap().len(), 2);

        let history = repo.get_for_envelope(env1).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].month, month(1));
        assert_eq!(history[1].month, month(3));
    }

    #[test]
    fn test_remove_for_envelope() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let env1 = EnvelopeId::new();
        let env2 = EnvelopeId::new();
        repo.upsert(MonthlyAllocation::new(env1, month(1), Money::zero()))
            .unwrap();
        repo.upsert(MonthlyAllocation::new(env1, month(2), Money::zero()))
            .unwrap();
        repo.upsert(MonthlyAllocation::new(env2, month(1), Money::zero()))
            .unwrap();

        assert_eq!(repo.remove_for_envelope(env1).unwrap(), 2);
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let env = EnvelopeId::new();
        repo.upsert(MonthlyAllocation::new(env, month(6), Money::from_cents(4200)))
            .unwrap();
        repo.save().unwrap();

        let repo2 = AllocationRepository::new(temp_dir.path().join("allocations.json"));
        repo2.load().unwrap();
        assert_eq!(repo2.get(env, month(6)).unwrap().unwrap().amount.cents(), 4200);
    }
}
