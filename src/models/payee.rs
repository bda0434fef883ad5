//! Payee model
//!
//! The counterparty of a transaction. Internal transfers use well-known
//! synthetic payees resolved by name.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::PayeeId;

/// A transaction counterparty
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payee {
    /// Unique identifier
    pub id: PayeeId,

    /// Payee name; unique in practice (case-insensitive)
    pub name: String,

    /// Optional default category for this payee
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// When the payee was created
    pub created_at: DateTime<Utc>,
}

impl Payee {
    /// Create a new payee
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: PayeeId::new(),
            name: name.into(),
            category: None,
            created_at: Utc::now(),
        }
    }

    /// Normalize a name for matching
    pub fn normalize_name(name: &str) -> String {
        name.trim().to_lowercase()
    }

    /// Check whether this payee matches a name (case-insensitive)
    pub fn matches_name(&self, name: &str) -> bool {
        Self::normalize_name(&self.name) == Self::normalize_name(name)
    }

    /// Validate the payee
    pub fn validate(&self) -> Result<(), PayeeValidationError> {
        if self.name.trim().is_empty() {
            return Err(PayeeValidationError::EmptyName);
        }
        if self.name.len() > 100 {
            return Err(PayeeValidationError::NameTooLong(self.name.len()));
        }
        Ok(())
    }
}

impl fmt::Display for Payee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for payees
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayeeValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for PayeeValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Payee name cannot be empty"),
            Self::NameTooLong(len) => write!(f, "Payee name too long ({} chars, max 100)", len),
        }
    }
}

impl std::error::Error for PayeeValidationError {}
