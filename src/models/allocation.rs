//! Monthly allocation model
//!
//! An explicit override of an envelope's default budget amount for one
//! specific month. Absence of an override means the default applies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::EnvelopeId;
use super::money::Money;
use super::month::Month;

/// A per-month budget override for an envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyAllocation {
    /// The envelope this override applies to
    pub envelope_id: EnvelopeId,

    /// The month it applies to
    pub month: Month,

    /// The overridden budget amount; never negative
    pub amount: Money,

    /// When this override was created
    pub created_at: DateTime<Utc>,

    /// When this override was last modified
    pub updated_at: DateTime<Utc>,
}

impl MonthlyAllocation {
    /// Create a new override
    pub fn new(envelope_id: EnvelopeId, month: Month, amount: Money) -> Self {
        let now = Utc::now();
        Self {
            envelope_id,
            month,
            amount,
            created_at: now,
            updated_at: now,
        }
    }

    /// Change the overridden amount
    pub fn set_amount(&mut self, amount: Money) {
        self.amount = amount;
        self.updated_at = Utc::now();
    }

    /// Validate the override
    pub fn validate(&self) -> Result<(), AllocationValidationError> {
        if self.amount.is_negative() {
            return Err(AllocationValidationError::NegativeAmount);
        }
        Ok(())
    }
}

impl fmt::Display for MonthlyAllocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.month, self.amount)
    }
}

/// Validation errors for monthly allocations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationValidationError {
    NegativeAmount,
}

impl fmt::Display for AllocationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount => write!(f, "Allocation amount cannot be negative"),
        }
    }
}

impl std::error::Error for AllocationValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_allocation() {
        let env_id = EnvelopeId::new();
        let month = Month::new(2025, 3).unwrap();
        let alloc = MonthlyAllocation::new(env_id, month, Money::from_cents(15000));
        assert_eq!(alloc.envelope_id, env_id);
        assert_eq!(alloc.month, month);
        assert_eq!(alloc.amount.cents(), 15000);
    }

    #[test]
    fn test_validation() {
        let mut alloc = MonthlyAllocation::new(
            EnvelopeId::new(),
            Month::new(2025, 1).unwrap(),
            Money::zero(),
        );
        assert!(alloc.validate().is_ok());

        alloc.amount = Money::from_cents(-100);
        assert_eq!(alloc.validate(), Err(AllocationValidationError::NegativeAmount));
    }

    #[test]
    fn test_serialization() {
        let alloc = MonthlyAllocation::new(
            EnvelopeId::new(),
            Month::new(2025, 6).unwrap(),
            Money::from_cents(4200),
        );
        let json = serde_json::to_string(&alloc).unwrap();
        assert!(json.contains("\"2025-06\""));
        let back: MonthlyAllocation = serde_json::from_str(&json).unwrap();
        assert_eq!(back.envelope_id, alloc.envelope_id);
        assert_eq!(back.month, alloc.month);
        assert_eq!(back.amount, alloc.amount);
    }
}
