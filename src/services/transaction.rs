//! Transaction writer
//!
//! The single write path for transactions: referential checks happen
//! here, before anything mutates, and the register stays sorted by date
//! descending.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    AccountId, EnvelopeId, Money, PayeeId, Transaction, TransactionId, TransactionKind,
};
use crate::storage::LedgerStore;

/// Input for creating a transaction
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub account_id: AccountId,
    pub envelope_id: Option<EnvelopeId>,
    pub payee_id: PayeeId,
    pub amount: Money,
    pub kind: TransactionKind,
    pub description: Option<String>,
    pub date: NaiveDate,
}

/// Field changes for an existing transaction
///
/// `envelope_id` follows the double-Option pattern: `None` keeps the
/// current value, `Some(None)` clears it, `Some(Some(id))` sets it.
#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub account_id: Option<AccountId>,
    pub envelope_id: Option<Option<EnvelopeId>>,
    pub payee_id: Option<PayeeId>,
    pub amount: Option<Money>,
    pub kind: Option<TransactionKind>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
}

/// Service for transaction writes and reads
pub struct TransactionService<'a> {
    store: &'a LedgerStore,
}

impl<'a> TransactionService<'a> {
    pub fn new(store: &'a LedgerStore) -> Self {
        Self { store }
    }

    /// Append a new transaction
    pub fn add(&self, input: NewTransaction) -> LedgerResult<Transaction> {
        if !self.store.accounts.exists(input.account_id)? {
            return Err(LedgerError::account_not_found(input.account_id.to_string()));
        }
        if !self.store.payees.exists(input.payee_id)? {
            return Err(LedgerError::payee_not_found(input.payee_id.to_string()));
        }
        if let Some(envelope_id) = input.envelope_id {
            if !self.store.envelopes.exists(envelope_id)? {
                return Err(LedgerError::envelope_not_found(envelope_id.to_string()));
            }
        }

        let mut txn = Transaction::new(
            input.account_id,
            input.payee_id,
            input.amount,
            input.kind,
            input.date,
        );
        txn.envelope_id = input.envelope_id;
        if let Some(description) = input.description {
            txn.description = description;
        }

        txn.validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.store.transactions.insert(txn.clone())?;
        self.store.transactions.save()?;

        self.store.log_create(
            EntityType::Transaction,
            txn.id.to_string(),
            None,
            &txn,
        )?;

        Ok(txn)
    }

    /// Merge field changes into an existing transaction
    ///
    /// Changed references must resolve and a changed amount must be
    /// positive, but cross-field consistency is not re-checked: switching
    /// kind from expense to income does not clear the envelope; that is
    /// the caller's call.
    pub fn update(&self, id: TransactionId, patch: TransactionPatch) -> LedgerResult<Transaction> {
        let mut txn = self
            .store
            .transactions
            .get(id)?
            .ok_or_else(|| LedgerError::transaction_not_found(id.to_string()))?;

        let before = txn.clone();

        if let Some(account_id) = patch.account_id {
            if !self.store.accounts.exists(account_id)? {
                return Err(LedgerError::account_not_found(account_id.to_string()));
            }
            txn.account_id = account_id;
        }

        if let Some(envelope_id) = patch.envelope_id {
            if let Some(envelope_id) = envelope_id {
                if !self.store.envelopes.exists(envelope_id)? {
                    return Err(LedgerError::envelope_not_found(envelope_id.to_string()));
                }
            }
            txn.envelope_id = envelope_id;
        }

        if let Some(payee_id) = patch.payee_id {
            if !self.store.payees.exists(payee_id)? {
                return Err(LedgerError::payee_not_found(payee_id.to_string()));
            }
            txn.payee_id = payee_id;
        }

        if let Some(amount) = patch.amount {
            if !amount.is_positive() {
                return Err(LedgerError::Validation(format!(
                    "Transaction amount must be positive, got {}",
                    amount
                )));
            }
            txn.amount = amount;
        }

        if let Some(kind) = patch.kind {
            txn.kind = kind;
        }

        if let Some(description) = patch.description {
            txn.description = description;
        }

        if let Some(date) = patch.date {
            txn.date = date;
        }

        self.store.transactions.replace(txn.clone())?;
        self.store.transactions.save()?;

        self.store.log_update(
            EntityType::Transaction,
            txn.id.to_string(),
            None,
            &before,
            &txn,
            None,
        )?;

        Ok(txn)
    }

    /// Delete a transaction by id
    ///
    /// Does not cascade: removing one leg of a transfer pair leaves the
    /// sibling in place (discoverable via its transfer group).
    pub fn remove(&self, id: TransactionId) -> LedgerResult<Transaction> {
        let removed = self
            .store
            .transactions
            .remove(id)?
            .ok_or_else(|| LedgerError::transaction_not_found(id.to_string()))?;

        self.store.transactions.save()?;

        self.store.log_delete(
            EntityType::Transaction,
            removed.id.to_string(),
            None,
            &removed,
        )?;

        Ok(removed)
    }

    /// Get a transaction by id
    pub fn get(&self, id: TransactionId) -> LedgerResult<Option<Transaction>> {
        self.store.transactions.get(id)
    }

    /// All transactions, newest date first
    pub fn list(&self) -> LedgerResult<Vec<Transaction>> {
        self.store.transactions.get_all()
    }

    /// Transactions on one account, newest date first
    pub fn list_for_account(&self, account_id: AccountId) -> LedgerResult<Vec<Transaction>> {
        self.store.transactions.get_by_account(account_id)
    }

    /// Transactions on one envelope, newest date first
    pub fn list_for_envelope(&self, envelope_id: EnvelopeId) -> LedgerResult<Vec<Transaction>> {
        self.store.transactions.get_by_envelope(envelope_id)
    }

    /// Transactions dated within one month
    pub fn list_in_month(&self, month: crate::models::Month) -> LedgerResult<Vec<Transaction>> {
        self.store
            .transactions
            .get_in_range(month.start_date(), month.end_date())
    }

    /// Count transactions
    pub fn count(&self) -> LedgerResult<usize> {
        self.store.transactions.count()
    }
}
