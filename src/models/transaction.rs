//! Transaction model
//!
//! A dated money movement against an account. Amounts are always stored
//! positive; direction is carried by the transaction kind.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, EnvelopeId, PayeeId, TransactionId, TransferId};
use super::money::Money;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money flowing into the account
    Income,
    /// Money flowing out of the account
    Expense,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expense"),
        }
    }
}

/// A ledger transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// The account this transaction posts to
    pub account_id: AccountId,

    /// The envelope this spending is classified under; None for income
    /// or unclassified expenses
    #[serde(default)]
    pub envelope_id: Option<EnvelopeId>,

    /// The counterparty
    pub payee_id: PayeeId,

    /// Amount in cents; always strictly positive
    pub amount: Money,

    /// Direction of the movement
    pub kind: TransactionKind,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    /// Calendar date of the movement (distinct from created_at)
    pub date: NaiveDate,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// True only on the legs of an account-to-account transfer
    #[serde(default)]
    pub is_transfer: bool,

    /// Shared id linking the two legs of a transfer pair
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfer_group: Option<TransferId>,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(
        account_id: AccountId,
        payee_id: PayeeId,
        amount: Money,
        kind: TransactionKind,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            account_id,
            envelope_id: None,
            payee_id,
            amount,
            kind,
            description: String::new(),
            date,
            created_at: Utc::now(),
            is_transfer: false,
            transfer_group: None,
        }
    }

    /// Check if this leg belongs to a transfer pair
    pub fn is_transfer_leg(&self) -> bool {
        self.transfer_group.is_some()
    }

    /// The signed effect of this transaction on its account balance
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if !self.amount.is_positive() {
            return Err(TransactionValidationError::NonPositiveAmount(self.amount));
        }
        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.kind,
            self.signed_amount()
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NonPositiveAmount(Money),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Transaction amount must be positive, got {}", amount)
            }
        }
    }
}

impl std::error::Error for TransactionValidationError {}
