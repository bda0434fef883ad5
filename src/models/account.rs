//! Account model
//!
//! A money container whose balance is always derived from the opening
//! amount plus its transactions, never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::AccountId;
use super::money::Money;

/// A financial account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier
    pub id: AccountId,

    /// Account name (e.g., "Checking")
    pub name: String,

    /// Optional type tag (e.g., "checking", "savings", "credit")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Opening balance when the account was created; may be negative
    pub opening: Money,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with a zero opening balance
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: AccountId::new(),
            name: name.into(),
            kind: None,
            opening: Money::zero(),
            created_at: Utc::now(),
        }
    }

    /// Create a new account with an opening balance
    pub fn with_opening(name: impl Into<String>, opening: Money) -> Self {
        let mut account = Self::new(name);
        account.opening = opening;
        account
    }

    /// Validate the account
    pub fn validate(&self) -> Result<(), AccountValidationError> {
        if self.name.trim().is_empty() {
            return Err(AccountValidationError::EmptyName);
        }
        if self.name.len() > 100 {
            return Err(AccountValidationError::NameTooLong(self.name.len()));
        }
        Ok(())
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Some(kind) => write!(f, "{} ({})", self.name, kind),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Validation errors for accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Account name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Account name too long ({} chars, max 100)", len)
            }
        }
    }
}

impl std::error::Error for AccountValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account() {
        let account = Account::new("Checking");
        assert_eq!(account.name, "Checking");
        assert!(account.kind.is_none());
        assert_eq!(account.opening, Money::zero());
    }

    #[test]
    fn test_with_opening() {
        let account = Account::with_opening("Savings", Money::from_cents(-5000));
        assert_eq!(account.opening.cents(), -5000);
    }

    #[test]
    fn test_validation() {
        let mut account = Account::new("Valid");
        assert!(account.validate().is_ok());

        account.name = "  ".into();
        assert_eq!(account.validate(), Err(AccountValidationError::EmptyName));

        account.name = "x".repeat(101);
        assert!(matches!(
            account.validate(),
            Err(AccountValidationError::NameTooLong(_))
        ));
    }

    #[test]
    fn test_display() {
        let mut account = Account::new("Wallet");
        assert_eq!(account.to_string(), "Wallet");
        account.kind = Some("cash".into());
        assert_eq!(account.to_string(), "Wallet (cash)");
    }

    #[test]
    fn test_serialization() {
        let account = Account::with_opening("Checking", Money::from_cents(100000));
        let json = serde_json::to_string(&account).unwrap();
        let back: Account = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, account.id);
        assert_eq!(back.opening, account.opening);
    }
}
