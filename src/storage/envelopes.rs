//! Envelope repository
//!
//! In-memory envelope collection with JSON file load/save. Listings come
//! back in global display order (order_index, then name).

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::LedgerError;
use crate::models::{Envelope, EnvelopeId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct EnvelopeData {
    envelopes: Vec<Envelope>,
}

/// Repository for envelope persistence
pub struct EnvelopeRepository {
    path: PathBuf,
    data: RwLock<HashMap<EnvelopeId, Envelope>>,
}

impl EnvelopeRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load envelopes from disk
    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: EnvelopeData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for envelope in file_data.envelopes {
            data.insert(envelope.id, envelope);
        }
        Ok(())
    }

    /// Save envelopes to disk
    pub fn save(&self) -> Result<(), LedgerError> {
        let envelopes = self.get_all()?;
        write_json_atomic(&self.path, &EnvelopeData { envelopes })
    }

    /// Get an envelope by ID
    pub fn get(&self, id: EnvelopeId) -> Result<Option<Envelope>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.get(&id).cloned())
    }

    /// Get all envelopes in display order
    pub fn get_all(&self) -> Result<Vec<Envelope>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut envelopes: Vec<_> = data.values().cloned().collect();
        envelopes.sort_by(|a, b| a.order_index.cmp(&b.order_index).then(a.name.cmp(&b.name)));
        Ok(envelopes)
    }

    /// Get the envelopes of one category, in display order
    pub fn get_by_category(&self, category: &str) -> Result<Vec<Envelope>, LedgerError> {
        let all = self.get_all()?;
        Ok(all.into_iter().filter(|e| e.category == category).collect())
    }

    /// Distinct category names, ordered by the first envelope carrying each
    pub fn categories(&self) -> Result<Vec<String>, LedgerError> {
        let all = self.get_all()?;
        let mut seen = Vec::new();
        for envelope in all {
            if !seen.contains(&envelope.category) {
                seen.push(envelope.category);
            }
        }
        Ok(seen)
    }

    /// Highest order_index currently assigned, if any
    pub fn max_order_index(&self) -> Result<Option<i64>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.values().map(|e| e.order_index).max())
    }

    /// Insert or update an envelope
    pub fn upsert(&self, envelope: Envelope) -> Result<(), LedgerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        data.insert(envelope.id, envelope);
        Ok(())
    }

    /// Delete an envelope
    pub fn delete(&self, id: EnvelopeId) -> Result<bool, LedgerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        Ok(data.remove(&id).is_some())
    }

    /// Check if an envelope exists
    pub fn exists(&self, id: EnvelopeId) -> Result<bool, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.contains_key(&id))
    }

    /// Count envelopes
    pub fn count(&self) -> Result<usize, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.len())
    }
}
