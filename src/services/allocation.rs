//! Allocation resolver
//!
//! Answers "how much funding does this envelope get in that month":
//! the explicit monthly override when one exists, the envelope's default
//! budget otherwise.

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{EnvelopeId, Money, Month, MonthlyAllocation};
use crate::storage::LedgerStore;

/// Service resolving per-month envelope funding
pub struct AllocationService<'a> {
    store: &'a LedgerStore,
}

impl<'a> AllocationService<'a> {
    pub fn new(store: &'a LedgerStore) -> Self {
        Self { store }
    }

    /// The effective budget for an envelope in a month
    ///
    /// An unknown envelope contributes zero rather than erroring, so
    /// stale references degrade gracefully on the read path.
    pub fn effective_monthly_budget(
        &self,
        envelope_id: EnvelopeId,
        month: Month,
    ) -> LedgerResult<Money> {
        if let Some(allocation) = self.store.allocations.get(envelope_id, month)? {
            return Ok(allocation.amount);
        }
        Ok(self
            .store
            .envelopes
            .get(envelope_id)?
            .map(|e| e.budget)
            .unwrap_or_else(Money::zero))
    }

    /// Total effective budget across all envelopes for a month
    pub fn total_monthly_budgeted(&self, month: Month) -> LedgerResult<Money> {
        let mut total = Money::zero();
        for envelope in self.store.envelopes.get_all()? {
            total += self.effective_monthly_budget(envelope.id, month)?;
        }
        Ok(total)
    }

    /// The stored override for an envelope and month, if any
    pub fn get_override(
        &self,
        envelope_id: EnvelopeId,
        month: Month,
    ) -> LedgerResult<Option<MonthlyAllocation>> {
        self.store.allocations.get(envelope_id, month)
    }

    /// Override history for an envelope, in month order
    pub fn override_history(
        &self,
        envelope_id: EnvelopeId,
    ) -> LedgerResult<Vec<MonthlyAllocation>> {
        self.store.allocations.get_for_envelope(envelope_id)
    }

    /// Set (or replace) the override for an envelope and month
    pub fn set_monthly_allocation(
        &self,
        envelope_id: EnvelopeId,
        month: Month,
        amount: Money,
    ) -> LedgerResult<MonthlyAllocation> {
        let envelope = self
            .store
            .envelopes
            .get(envelope_id)?
            .ok_or_else(|| LedgerError::envelope_not_found(envelope_id.to_string()))?;

        let before = self.store.allocations.get(envelope_id, month)?;
        let allocation = match before.clone() {
            Some(mut existing) => {
                existing.set_amount(amount);
                existing
            }
            None => MonthlyAllocation::new(envelope_id, month, amount),
        };

        allocation
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.store.allocations.upsert(allocation.clone())?;
        self.store.allocations.save()?;

        match before {
            Some(previous) => self.store.log_update(
                EntityType::Allocation,
                format!("{}:{}", envelope_id, month),
                Some(envelope.name),
                &previous,
                &allocation,
                Some(format!("amount: {} -> {}", previous.amount, allocation.amount)),
            )?,
            None => self.store.log_create(
                EntityType::Allocation,
                format!("{}:{}", envelope_id, month),
                Some(envelope.name),
                &allocation,
            )?,
        }

        Ok(allocation)
    }

    /// Remove the override for an envelope and month
    ///
    /// The envelope's default budget applies again for that month.
    pub fn clear_monthly_allocation(
        &self,
        envelope_id: EnvelopeId,
        month: Month,
    ) -> LedgerResult<bool> {
        let existing = self.store.allocations.get(envelope_id, month)?;
        let Some(existing) = existing else {
            return Ok(false);
        };

        self.store.allocations.remove(envelope_id, month)?;
        self.store.allocations.save()?;

        let name = self.store.envelopes.get(envelope_id)?.map(|e| e.name);
        self.store.log_delete(
            EntityType::Allocation,
            format!("{}:{}", envelope_id, month),
            name,
            &existing,
        )?;

        Ok(true)
    }
}
