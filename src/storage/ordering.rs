//! Category ordering repository
//!
//! Persists the user-defined display order of category names. Display
//! metadata only; balances never depend on it.

use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::LedgerError;

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct OrderingData {
    #[serde(default)]
    categories: Vec<String>,
}

/// Repository for the category order list
pub struct OrderingRepository {
    path: PathBuf,
    data: RwLock<Vec<String>>,
}

impl OrderingRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    /// Load the order list from disk
    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: OrderingData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = file_data.categories;
        Ok(())
    }

    /// Save the order list to disk
    pub fn save(&self) -> Result<(), LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        write_json_atomic(
            &self.path,
            &OrderingData {
                categories: data.clone(),
            },
        )
    }

    /// The stored category order
    pub fn get(&self) -> Result<Vec<String>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.clone())
    }

    /// Replace the stored category order
    pub fn set(&self, categories: Vec<String>) -> Result<(), LedgerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = categories;
        Ok(())
    }
}
