//! Path management for the ledger data directory
//!
//! ## Path Resolution Order
//!
//! 1. `ENVELOPE_LEDGER_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_DATA_HOME/envelope-ledger` or
//!    `~/.local/share/envelope-ledger`
//! 3. Windows: `%APPDATA%\envelope-ledger`

use std::path::PathBuf;

use crate::error::LedgerError;

/// Resolves every file path the ledger store uses
#[derive(Debug, Clone)]
pub struct LedgerPaths {
    base_dir: PathBuf,
}

impl LedgerPaths {
    /// Create paths using the platform default resolution
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, LedgerError> {
        let base_dir = match std::env::var("ENVELOPE_LEDGER_DATA_DIR") {
            Ok(custom) => PathBuf::from(custom),
            Err(_) => resolve_default_path()?,
        };
        Ok(Self { base_dir })
    }

    /// Create paths rooted at a custom directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// The base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// The directory holding the collection files
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Path to accounts.json
    pub fn accounts_file(&self) -> PathBuf {
        self.data_dir().join("accounts.json")
    }

    /// Path to envelopes.json
    pub fn envelopes_file(&self) -> PathBuf {
        self.data_dir().join("envelopes.json")
    }

    /// Path to payees.json
    pub fn payees_file(&self) -> PathBuf {
        self.data_dir().join("payees.json")
    }

    /// Path to transactions.json
    pub fn transactions_file(&self) -> PathBuf {
        self.data_dir().join("transactions.json")
    }

    /// Path to allocations.json
    pub fn allocations_file(&self) -> PathBuf {
        self.data_dir().join("allocations.json")
    }

    /// Path to ordering.json
    pub fn ordering_file(&self) -> PathBuf {
        self.data_dir().join("ordering.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), LedgerError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| LedgerError::Io(format!("Failed to create base directory: {}", e)))?;
        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| LedgerError::Io(format!("Failed to create data directory: {}", e)))?;
        Ok(())
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, LedgerError> {
    let data_base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .or_else(|_| {
            std::env::var("HOME").map(|home| PathBuf::from(home).join(".local").join("share"))
        })
        .map_err(|_| LedgerError::Io("Could not determine home directory".into()))?;
    Ok(data_base.join("envelope-ledger"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, LedgerError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| LedgerError::Io("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("envelope-ledger"))
}
