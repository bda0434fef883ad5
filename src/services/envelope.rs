//! Envelope service
//!
//! CRUD for envelopes. Creation assigns the next global order index;
//! category changes and deletions keep the persisted category order list
//! covering exactly the categories that still have envelopes.

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Envelope, EnvelopeId, Money};
use crate::storage::LedgerStore;

/// Service for envelope management
pub struct EnvelopeService<'a> {
    store: &'a LedgerStore,
}

impl<'a> EnvelopeService<'a> {
    pub fn new(store: &'a LedgerStore) -> Self {
        Self { store }
    }

    /// Create a new envelope
    pub fn create(
        &self,
        name: &str,
        category: &str,
        budget: Money,
        estimate: Option<Money>,
        due_day: Option<u32>,
    ) -> LedgerResult<Envelope> {
        let name = name.trim();
        let category = category.trim();

        let mut envelope = Envelope::new(name, category, budget);
        envelope.estimate = estimate;
        envelope.due_day = due_day;

        envelope
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let max_order = self.store.envelopes.max_order_index()?.unwrap_or(-1);
        envelope.order_index = max_order + 1;

        self.store.envelopes.upsert(envelope.clone())?;
        self.store.envelopes.save()?;

        self.register_category(category)?;

        self.store.log_create(
            EntityType::Envelope,
            envelope.id.to_string(),
            Some(envelope.name.clone()),
            &envelope,
        )?;

        Ok(envelope)
    }

    /// Get an envelope by ID
    pub fn get(&self, id: EnvelopeId) -> LedgerResult<Option<Envelope>> {
        self.store.envelopes.get(id)
    }

    /// All envelopes in display order
    pub fn list(&self) -> LedgerResult<Vec<Envelope>> {
        self.store.envelopes.get_all()
    }

    /// The envelopes of one category, in display order
    pub fn list_by_category(&self, category: &str) -> LedgerResult<Vec<Envelope>> {
        self.store.envelopes.get_by_category(category)
    }

    /// Update an envelope
    pub fn update(
        &self,
        id: EnvelopeId,
        name: Option<&str>,
        category: Option<&str>,
        budget: Option<Money>,
        estimate: Option<Option<Money>>,
        due_day: Option<Option<u32>>,
    ) -> LedgerResult<Envelope> {
        let mut envelope = self
            .store
            .envelopes
            .get(id)?
            .ok_or_else(|| LedgerError::envelope_not_found(id.to_string()))?;

        let before = envelope.clone();

        if let Some(new_name) = name {
            envelope.name = new_name.trim().to_string();
        }
        if let Some(new_category) = category {
            envelope.category = new_category.trim().to_string();
        }
        if let Some(new_budget) = budget {
            envelope.budget = new_budget;
        }
        if let Some(new_estimate) = estimate {
            envelope.estimate = new_estimate;
        }
        if let Some(new_due_day) = due_day {
            envelope.due_day = new_due_day;
        }

        envelope
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.store.envelopes.upsert(envelope.clone())?;
        self.store.envelopes.save()?;

        if before.category != envelope.category {
            self.register_category(&envelope.category)?;
            self.prune_category(&before.category)?;
        }

        let diff = if before.budget != envelope.budget {
            Some(format!("budget: {} -> {}", before.budget, envelope.budget))
        } else if before.category != envelope.category {
            Some(format!("category: {} -> {}", before.category, envelope.category))
        } else {
            None
        };

        self.store.log_update(
            EntityType::Envelope,
            envelope.id.to_string(),
            Some(envelope.name.clone()),
            &before,
            &envelope,
            diff,
        )?;

        Ok(envelope)
    }

    /// Delete an envelope
    ///
    /// Its monthly overrides go with it and its category is pruned from
    /// the order list when no other envelope uses it. Transactions that
    /// referenced the envelope are left in place; derivations treat the
    /// stale reference as contributing zero.
    pub fn delete(&self, id: EnvelopeId) -> LedgerResult<Envelope> {
        let envelope = self
            .store
            .envelopes
            .get(id)?
            .ok_or_else(|| LedgerError::envelope_not_found(id.to_string()))?;

        self.store.envelopes.delete(id)?;
        self.store.envelopes.save()?;

        self.store.allocations.remove_for_envelope(id)?;
        self.store.allocations.save()?;

        self.prune_category(&envelope.category)?;

        self.store.log_delete(
            EntityType::Envelope,
            envelope.id.to_string(),
            Some(envelope.name.clone()),
            &envelope,
        )?;

        Ok(envelope)
    }

    /// Add a category to the order list if it is not there yet
    fn register_category(&self, category: &str) -> LedgerResult<()> {
        let mut order = self.store.ordering.get()?;
        if !order.iter().any(|c| c == category) {
            order.push(category.to_string());
            self.store.ordering.set(order)?;
            self.store.ordering.save()?;
        }
        Ok(())
    }

    /// Drop a category from the order list when no envelope uses it anymore
    fn prune_category(&self, category: &str) -> LedgerResult<()> {
        if self.store.envelopes.get_by_category(category)?.is_empty() {
            let mut order = self.store.ordering.get()?;
            order.retain(|c| c != category);
            self.store.ordering.set(order)?;
            self.store.ordering.save()?;
        }
        Ok(())
    }
}
