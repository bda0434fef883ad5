//! Transfer orchestrator
//!
//! A transfer is never an entity of its own: it is a pair of linked
//! transactions sharing one synthetic payee and one transfer group id.
//! Every validation runs before the first leg is written, so the
//! operation either commits both legs or writes nothing.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    AccountId, EnvelopeId, Money, Transaction, TransactionId, TransactionKind, TransferId,
};
use crate::services::PayeeService;
use crate::storage::LedgerStore;

/// Payee name used for account-to-account transfers
pub const ACCOUNT_TRANSFER_PAYEE: &str = "Internal Account Transfer";

/// Payee name used for envelope-to-envelope transfers
pub const BUDGET_TRANSFER_PAYEE: &str = "Internal Budget Transfer";

/// Service for transfers between accounts or between envelopes
pub struct TransferService<'a> {
    store: &'a LedgerStore,
}

/// The two legs of a committed transfer
#[derive(Debug, Clone)]
pub struct TransferResult {
    /// The expense leg (money leaving)
    pub from_transaction: Transaction,
    /// The income leg (money arriving)
    pub to_transaction: Transaction,
}

impl<'a> TransferService<'a> {
    pub fn new(store: &'a LedgerStore) -> Self {
        Self { store }
    }

    /// Move money between two accounts
    ///
    /// Writes an expense leg on the source and an income leg on the
    /// destination, both flagged `is_transfer` so income/spending
    /// aggregates can skip them.
    pub fn transfer_between_accounts(
        &self,
        from_account_id: AccountId,
        to_account_id: AccountId,
        amount: Money,
        date: NaiveDate,
        description: Option<String>,
    ) -> LedgerResult<TransferResult> {
        if from_account_id == to_account_id {
            return Err(LedgerError::Validation(
                "Cannot transfer to the same account".into(),
            ));
        }
        if !amount.is_positive() {
            return Err(LedgerError::Validation(
                "Transfer amount must be positive".into(),
            ));
        }

        let from_account = self
            .store
            .accounts
            .get(from_account_id)?
            .ok_or_else(|| LedgerError::account_not_found(from_account_id.to_string()))?;
        let to_account = self
            .store
            .accounts
            .get(to_account_id)?
            .ok_or_else(|| LedgerError::account_not_found(to_account_id.to_string()))?;

        // Payee resolution persists before either leg exists
        let payee = PayeeService::new(self.store).resolve_or_create(ACCOUNT_TRANSFER_PAYEE)?;
        let group = TransferId::new();

        let mut from_txn = Transaction::new(
            from_account_id,
            payee.id,
            amount,
            TransactionKind::Expense,
            date,
        );
        from_txn.is_transfer = true;
        from_txn.transfer_group = Some(group);
        from_txn.description = description
            .clone()
            .unwrap_or_else(|| format!("Transfer to {}", to_account.name));

        let mut to_txn = Transaction::new(
            to_account_id,
            payee.id,
            amount,
            TransactionKind::Income,
            date,
        );
        to_txn.is_transfer = true;
        to_txn.transfer_group = Some(group);
        to_txn.description =
            description.unwrap_or_else(|| format!("Transfer from {}", from_account.name));

        self.commit_pair(from_txn, to_txn)
    }

    /// Move budgeted money between two envelopes
    ///
    /// Both legs post to the same carrier account (envelope transfers do
    /// not move money between accounts), so the account balance is
    /// untouched. Legs are not flagged `is_transfer`: that flag is
    /// reserved for account-level transfers.
    pub fn transfer_between_envelopes(
        &self,
        from_envelope_id: EnvelopeId,
        to_envelope_id: EnvelopeId,
        amount: Money,
        account_id: AccountId,
        date: NaiveDate,
        description: Option<String>,
    ) -> LedgerResult<TransferResult> {
        if from_envelope_id == to_envelope_id {
            return Err(LedgerError::Validation(
                "Cannot transfer to the same envelope".into(),
            ));
        }
        if !amount.is_positive() {
            return Err(LedgerError::Validation(
                "Transfer amount must be positive".into(),
            ));
        }

        let from_envelope = self
            .store
            .envelopes
            .get(from_envelope_id)?
            .ok_or_else(|| LedgerError::envelope_not_found(from_envelope_id.to_string()))?;
        let to_envelope = self
            .store
            .envelopes
            .get(to_envelope_id)?
            .ok_or_else(|| LedgerError::envelope_not_found(to_envelope_id.to_string()))?;
        if !self.store.accounts.exists(account_id)? {
            return Err(LedgerError::account_not_found(account_id.to_string()));
        }

        let payee = PayeeService::new(self.store).resolve_or_create(BUDGET_TRANSFER_PAYEE)?;
        let group = TransferId::new();

        let mut from_txn = Transaction::new(
            account_id,
            payee.id,
            amount,
            TransactionKind::Expense,
            date,
        );
        from_txn.envelope_id = Some(from_envelope_id);
        from_txn.transfer_group = Some(group);
        from_txn.description = description
            .clone()
            .unwrap_or_else(|| format!("Transfer to {}", to_envelope.name));

        let mut to_txn =
            Transaction::new(account_id, payee.id, amount, TransactionKind::Income, date);
        to_txn.envelope_id = Some(to_envelope_id);
        to_txn.transfer_group = Some(group);
        to_txn.description =
            description.unwrap_or_else(|| format!("Transfer from {}", from_envelope.name));

        self.commit_pair(from_txn, to_txn)
    }

    /// The sibling leg of a transfer transaction, when one exists
    pub fn linked_leg(&self, transaction_id: TransactionId) -> LedgerResult<Option<Transaction>> {
        let txn = self
            .store
            .transactions
            .get(transaction_id)?
            .ok_or_else(|| LedgerError::transaction_not_found(transaction_id.to_string()))?;

        let Some(group) = txn.transfer_group else {
            return Ok(None);
        };

        Ok(self
            .store
            .transactions
            .get_all()?
            .into_iter()
            .find(|t| t.transfer_group == Some(group) && t.id != transaction_id))
    }

    /// Insert both legs and persist once
    ///
    /// Both transactions are fully built and validated before the first
    /// insert; the in-memory inserts cannot fail halfway, so no
    /// one-sided transfer is ever observable.
    fn commit_pair(
        &self,
        from_txn: Transaction,
        to_txn: Transaction,
    ) -> LedgerResult<TransferResult> {
        from_txn
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;
        to_txn
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.store.transactions.insert(from_txn.clone())?;
        self.store.transactions.insert(to_txn.clone())?;
        self.store.transactions.save()?;

        self.store.log_create(
            EntityType::Transaction,
            from_txn.id.to_string(),
            Some(from_txn.description.clone()),
            &from_txn,
        )?;
        self.store.log_create(
            EntityType::Transaction,
            to_txn.id.to_string(),
            Some(to_txn.description.clone()),
            &to_txn,
        )?;

        Ok(TransferResult {
            from_transaction: from_txn,
            to_transaction: to_txn,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LedgerPaths;
    use crate::models::{Account, Envelope};
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, LedgerStore) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let store = LedgerStore::open(paths).unwrap();
        store.load_all().unwrap();
        (temp_dir, store)
    }

    fn setup_accounts(store: &LedgerStore) -> (AccountId, AccountId) {
        let checking = Account::with_opening("Checking", Money::from_cents(95000));
        let savings = Account::with_opening("Savings", Money::from_cents(50000));
        let ids = (checking.id, savings.id);
        store.accounts.upsert(checking).unwrap();
        store.accounts.upsert(savings).unwrap();
        ids
    }

    fn setup_envelopes(store: &LedgerStore) -> (EnvelopeId, EnvelopeId) {
        let groceries = Envelope::new("Groceries", "Living", Money::from_cents(20000));
        let dining = Envelope::new("Dining Out", "Living", Money::from_cents(10000));
        let ids = (groceries.id, dining.id);
        store.envelopes.upsert(groceries).unwrap();
        store.envelopes.upsert(dining).unwrap();
        ids
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    #[test]
    fn test_account_transfer_writes_linked_pair() {
        let (_temp_dir, store) = create_test_store();
        let (checking, savings) = setup_accounts(&store);
        let service = TransferService::new(&store);

        let result = service
            .transfer_between_accounts(checking, savings, Money::from_cents(10000), date(), None)
            .unwrap();

        assert_eq!(result.from_transaction.account_id, checking);
        assert_eq!(result.from_transaction.kind, TransactionKind::Expense);
        assert!(result.from_transaction.is_transfer);
        assert!(result.from_transaction.envelope_id.is_none());
        assert_eq!(result.from_transaction.description, "Transfer to Savings");

        assert_eq!(result.to_transaction.account_id, savings);
        assert_eq!(result.to_transaction.kind, TransactionKind::Income);
        assert!(result.to_transaction.is_transfer);
        assert_eq!(result.to_transaction.description, "Transfer from Checking");

        assert_eq!(
            result.from_transaction.transfer_group,
            result.to_transaction.transfer_group
        );
        assert!(result.from_transaction.transfer_group.is_some());
        assert_eq!(result.from_transaction.payee_id, result.to_transaction.payee_id);
        assert_eq!(store.transactions.count().unwrap(), 2);
    }

    #[test]
    fn test_account_transfer_payee_is_idempotent() {
        let (_temp_dir, store) = create_test_store();
        let (checking, savings) = setup_accounts(&store);
        let service = TransferService::new(&store);

        service
            .transfer_between_accounts(checking, savings, Money::from_cents(100), date(), None)
            .unwrap();
        service
            .transfer_between_accounts(savings, checking, Money::from_cents(200), date(), None)
            .unwrap();

        assert_eq!(store.payees.count().unwrap(), 1);
        let payee = store.payees.get_by_name(ACCOUNT_TRANSFER_PAYEE).unwrap();
        assert!(payee.is_some());
    }

    #[test]
    fn test_same_account_rejected_without_side_effects() {
        let (_temp_dir, store) = create_test_store();
        let (checking, _) = setup_accounts(&store);
        let service = TransferService::new(&store);

        let result = service.transfer_between_accounts(
            checking,
            checking,
            Money::from_cents(100),
            date(),
            None,
        );

        assert!(matches!(result, Err(LedgerError::Validation(_))));
        assert_eq!(store.transactions.count().unwrap(), 0);
        assert_eq!(store.payees.count().unwrap(), 0);
    }

    #[test]
    fn test_non_positive_amount_rejected_without_side_effects() {
        let (_temp_dir, store) = create_test_store();
        let (checking, savings) = setup_accounts(&store);
        let service = TransferService::new(&store);

        for cents in [0, -500] {
            let result = service.transfer_between_accounts(
                checking,
                savings,
                Money::from_cents(cents),
                date(),
                None,
            );
            assert!(matches!(result, Err(LedgerError::Validation(_))));
        }
        assert_eq!(store.transactions.count().unwrap(), 0);
    }

    #[test]
    fn test_unknown_account_rejected() {
        let (_temp_dir, store) = create_test_store();
        let (checking, _) = setup_accounts(&store);
        let service = TransferService::new(&store);

        let result = service.transfer_between_accounts(
            checking,
            AccountId::new(),
            Money::from_cents(100),
            date(),
            None,
        );
        assert!(matches!(result, Err(LedgerError::NotFound { .. })));
        assert_eq!(store.transactions.count().unwrap(), 0);
    }

    #[test]
    fn test_custom_description_applies_to_both_legs() {
        let (_temp_dir, store) = create_test_store();
        let (checking, savings) = setup_accounts(&store);
        let service = TransferService::new(&store);

        let result = service
            .transfer_between_accounts(
                checking,
                savings,
                Money::from_cents(100),
                date(),
                Some("Vacation fund".into()),
            )
            .unwrap();

        assert_eq!(result.from_transaction.description, "Vacation fund");
        assert_eq!(result.to_transaction.description, "Vacation fund");
    }

    #[test]
    fn test_envelope_transfer_books_both_legs_on_one_account() {
        let (_temp_dir, store) = create_test_store();
        let (checking, _) = setup_accounts(&store);
        let (groceries, dining) = setup_envelopes(&store);
        let service = TransferService::new(&store);

        let result = service
            .transfer_between_envelopes(
                groceries,
                dining,
                Money::from_cents(2500),
                checking,
                date(),
                None,
            )
            .unwrap();

        assert_eq!(result.from_transaction.account_id, checking);
        assert_eq!(result.to_transaction.account_id, checking);
        assert_eq!(result.from_transaction.envelope_id, Some(groceries));
        assert_eq!(result.to_transaction.envelope_id, Some(dining));

        // The transfer flag is reserved for account-level transfers
        assert!(!result.from_transaction.is_transfer);
        assert!(!result.to_transaction.is_transfer);
        assert_eq!(
            result.from_transaction.transfer_group,
            result.to_transaction.transfer_group
        );

        let payee = store.payees.get_by_name(BUDGET_TRANSFER_PAYEE).unwrap();
        assert!(payee.is_some());
    }

    #[test]
    fn test_envelope_transfer_rejections() {
        let (_temp_dir, store) = create_test_store();
        let (checking, _) = setup_accounts(&store);
        let (groceries, dining) = setup_envelopes(&store);
        let service = TransferService::new(&store);

        // same envelope
        assert!(service
            .transfer_between_envelopes(groceries, groceries, Money::from_cents(100), checking, date(), None)
            .is_err());
        // zero amount
        assert!(service
            .transfer_between_envelopes(groceries, dining, Money::zero(), checking, date(), None)
            .is_err());
        // unknown carrier account
        assert!(service
            .transfer_between_envelopes(groceries, dining, Money::from_cents(100), AccountId::new(), date(), None)
            .is_err());

        assert_eq!(store.transactions.count().unwrap(), 0);
    }

    #[test]
    fn test_linked_leg() {
        let (_temp_dir, store) = create_test_store();
        let (checking, savings) = setup_accounts(&store);
        let service = TransferService::new(&store);

        let result = service
            .transfer_between_accounts(checking, savings, Money::from_cents(100), date(), None)
            .unwrap();

        let sibling = service
            .linked_leg(result.from_transaction.id)
            .unwrap()
            .unwrap();
        assert_eq!(sibling.id, result.to_transaction.id);

        // A plain transaction has no sibling
        let payee = store.payees.get_by_name(ACCOUNT_TRANSFER_PAYEE).unwrap().unwrap();
        let mut plain = Transaction::new(
            checking,
            payee.id,
            Money::from_cents(50),
            TransactionKind::Expense,
            date(),
        );
        plain.transfer_group = None;
        let plain_id = plain.id;
        store.transactions.insert(plain).unwrap();
        assert!(service.linked_leg(plain_id).unwrap().is_none());
    }
}
