//! Payee repository
//!
//! In-memory payee collection with JSON file load/save.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::LedgerError;
use crate::models::{Payee, PayeeId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct PayeeData {
    payees: Vec<Payee>,
}

/// Repository for payee persistence
pub struct PayeeRepository {
    path: PathBuf,
    data: RwLock<HashMap<PayeeId, Payee>>,
}

impl PayeeRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load payees from disk
    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: PayeeData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for payee in file_data.payees {
            data.insert(payee.id, payee);
        }
        Ok(())
    }

    /// Save payees to disk
    pub fn save(&self) -> Result<(), LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut payees: Vec<_> = data.values().cloned().collect();
        payees.sort_by(|a, b| a.name.cmp(&b.name));

        write_json_atomic(&self.path, &PayeeData { payees })
    }

    /// Get a payee by ID
    pub fn get(&self, id: PayeeId) -> Result<Option<Payee>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.get(&id).cloned())
    }

    /// Get all payees, sorted by name
    pub fn get_all(&self) -> Result<Vec<Payee>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut payees: Vec<_> = data.values().cloned().collect();
        payees.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(payees)
    }

    /// Get a payee by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Result<Option<Payee>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.values().find(|p| p.matches_name(name)).cloned())
    }

    /// Insert or update a payee
    pub fn upsert(&self, payee: Payee) -> Result<(), LedgerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        data.insert(payee.id, payee);
        Ok(())
    }

    /// Check if a payee exists
    pub fn exists(&self, id: PayeeId) -> Result<bool, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.contains_key(&id))
    }

    /// Count payees
    pub fn count(&self) -> Result<usize, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.len())
    }
}
