//! Balance calculator
//!
//! Pure derivations over the store: account balances, envelope spending,
//! envelope rollover balances, and the monthly/year-to-date aggregates
//! the dashboard shows. Nothing here mutates, and a stale reference
//! contributes zero instead of erroring.

use chrono::{Datelike, NaiveDate};

use crate::error::LedgerResult;
use crate::models::{AccountId, EnvelopeId, Money, Month, Transaction, TransactionKind};
use crate::services::AllocationService;
use crate::storage::LedgerStore;

/// Service deriving every balance shown to the user
pub struct BalanceService<'a> {
    store: &'a LedgerStore,
}

impl<'a> BalanceService<'a> {
    pub fn new(store: &'a LedgerStore) -> Self {
        Self { store }
    }

    /// Current balance of an account
    ///
    /// Opening balance plus every matching transaction, income adding
    /// and expense subtracting. Addition commutes, so the result is
    /// independent of insertion order. A missing account contributes a
    /// zero opening balance.
    pub fn account_balance(&self, account_id: AccountId) -> LedgerResult<Money> {
        let opening = self
            .store
            .accounts
            .get(account_id)?
            .map(|a| a.opening)
            .unwrap_or_else(Money::zero);

        let movement: Money = self
            .store
            .transactions
            .get_by_account(account_id)?
            .iter()
            .map(Transaction::signed_amount)
            .sum();

        Ok(opening + movement)
    }

    /// Expense total for an envelope within one month
    ///
    /// Display figure for progress bars; the authoritative available
    /// balance is [`Self::envelope_balance_with_rollover`].
    pub fn envelope_spending(&self, envelope_id: EnvelopeId, month: Month) -> LedgerResult<Money> {
        Ok(self
            .store
            .transactions
            .get_by_envelope(envelope_id)?
            .iter()
            .filter(|t| t.kind == TransactionKind::Expense && month.contains(t.date))
            .map(|t| t.amount)
            .sum())
    }

    /// Expense total for an envelope in the month containing today
    pub fn envelope_spending_current(&self, envelope_id: EnvelopeId) -> LedgerResult<Money> {
        self.envelope_spending(envelope_id, Month::current())
    }

    /// Money still available in an envelope, rollover included
    pub fn envelope_balance_with_rollover(&self, envelope_id: EnvelopeId) -> LedgerResult<Money> {
        self.envelope_balance_with_rollover_on(envelope_id, chrono::Local::now().date_naive())
    }

    /// Rollover balance as seen on a given day
    ///
    /// Funding is the sum of the effective monthly budget over every
    /// month from the envelope's creation month through the month of
    /// `today`, so a mid-history override changes only the months it
    /// names. Income on the envelope adds, expenses subtract, and the
    /// result may be negative (overspent), never clamped. An envelope
    /// whose creation month is still in the future, or one that no
    /// longer exists, has balance zero.
    pub fn envelope_balance_with_rollover_on(
        &self,
        envelope_id: EnvelopeId,
        today: NaiveDate,
    ) -> LedgerResult<Money> {
        let Some(envelope) = self.store.envelopes.get(envelope_id)? else {
            return Ok(Money::zero());
        };

        let created = Month::of(envelope.created_at.date_naive());
        let current = Month::of(today);
        if current.months_since(created) < 0 {
            return Ok(Money::zero());
        }

        let allocations = AllocationService::new(self.store);
        let mut funded = Money::zero();
        for month in Month::span(created, current) {
            funded += allocations.effective_monthly_budget(envelope_id, month)?;
        }

        let transactions = self.store.transactions.get_by_envelope(envelope_id)?;
        let inflows: Money = transactions
            .iter()
            .filter(|t| t.kind == TransactionKind::Income)
            .map(|t| t.amount)
            .sum();
        let outflows: Money = transactions
            .iter()
            .filter(|t| t.kind == TransactionKind::Expense)
            .map(|t| t.amount)
            .sum();

        Ok(funded + inflows - outflows)
    }

    /// Income total for one month, excluding account-transfer legs
    pub fn monthly_income(&self, month: Month) -> LedgerResult<Money> {
        self.sum_in_range(month.start_date(), month.end_date(), TransactionKind::Income)
    }

    /// Spending total for one month, excluding account-transfer legs
    pub fn monthly_spending(&self, month: Month) -> LedgerResult<Money> {
        self.sum_in_range(month.start_date(), month.end_date(), TransactionKind::Expense)
    }

    /// Income from January 1 of `as_of`'s year through `as_of`
    pub fn ytd_income(&self, as_of: NaiveDate) -> LedgerResult<Money> {
        let jan1 = NaiveDate::from_ymd_opt(as_of.year(), 1, 1).unwrap_or(as_of);
        self.sum_in_range(jan1, as_of, TransactionKind::Income)
    }

    /// Spending from January 1 of `as_of`'s year through `as_of`
    pub fn ytd_spending(&self, as_of: NaiveDate) -> LedgerResult<Money> {
        let jan1 = NaiveDate::from_ymd_opt(as_of.year(), 1, 1).unwrap_or(as_of);
        self.sum_in_range(jan1, as_of, TransactionKind::Expense)
    }

    fn sum_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        kind: TransactionKind,
    ) -> LedgerResult<Money> {
        Ok(self
            .store
            .transactions
            .get_in_range(start, end)?
            .iter()
            .filter(|t| t.kind == kind && !t.is_transfer)
            .map(|t| t.amount)
            .sum())
    }
}
