//! Envelope model
//!
//! A budget category with a default monthly funding amount. The money
//! still available in an envelope is always derived (see the balance
//! service); only configuration lives here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::EnvelopeId;
use super::money::Money;

/// A budget envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    /// Unique identifier
    pub id: EnvelopeId,

    /// Envelope name (e.g., "Groceries")
    pub name: String,

    /// Category this envelope is grouped under; never empty
    pub category: String,

    /// Default monthly budget amount; never negative
    pub budget: Money,

    /// Informational estimate of the real monthly cost; not used in
    /// balance math
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimate: Option<Money>,

    /// Day of month a related bill is due (1-31)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_day: Option<u32>,

    /// Position in the global display order; the counter is shared
    /// across categories
    #[serde(default)]
    pub order_index: i64,

    /// When the envelope was created
    pub created_at: DateTime<Utc>,
}

impl Envelope {
    /// Create a new envelope
    pub fn new(name: impl Into<String>, category: impl Into<String>, budget: Money) -> Self {
        Self {
            id: EnvelopeId::new(),
            name: name.into(),
            category: category.into(),
            budget,
            estimate: None,
            due_day: None,
            order_index: 0,
            created_at: Utc::now(),
        }
    }

    /// Validate the envelope
    pub fn validate(&self) -> Result<(), EnvelopeValidationError> {
        if self.name.trim().is_empty() {
            return Err(EnvelopeValidationError::EmptyName);
        }
        if self.category.trim().is_empty() {
            return Err(EnvelopeValidationError::EmptyCategory);
        }
        if self.budget.is_negative() {
            return Err(EnvelopeValidationError::NegativeBudget);
        }
        if let Some(day) = self.due_day {
            if !(1..=31).contains(&day) {
                return Err(EnvelopeValidationError::InvalidDueDay(day));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.category)
    }
}

/// Validation errors for envelopes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeValidationError {
    EmptyName,
    EmptyCategory,
    NegativeBudget,
    InvalidDueDay(u32),
}

impl fmt::Display for EnvelopeValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Envelope name cannot be empty"),
            Self::EmptyCategory => write!(f, "Envelope category cannot be empty"),
            Self::NegativeBudget => write!(f, "Budget amount cannot be negative"),
            Self::InvalidDueDay(day) => write!(f, "Due day must be 1-31, got {}", day),
        }
    }
}

impl std::error::Error for EnvelopeValidationError {}
