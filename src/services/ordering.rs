//! Ordering manager
//!
//! User-defined display order for categories and for envelopes within a
//! category. Pure presentation metadata persisted alongside the ledger;
//! no balance depends on it.

use std::collections::HashSet;

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::EnvelopeId;
use crate::storage::LedgerStore;

/// Service for display-order maintenance
pub struct OrderingService<'a> {
    store: &'a LedgerStore,
}

impl<'a> OrderingService<'a> {
    pub fn new(store: &'a LedgerStore) -> Self {
        Self { store }
    }

    /// The category display order
    ///
    /// Reconciled against the live envelope set on read: categories with
    /// no envelopes left are dropped, categories the list does not know
    /// yet are appended. The stored list is not modified.
    pub fn category_order(&self) -> LedgerResult<Vec<String>> {
        let live = self.store.envelopes.categories()?;
        let stored = self.store.ordering.get()?;

        let mut order: Vec<String> = stored
            .into_iter()
            .filter(|c| live.contains(c))
            .collect();
        for category in live {
            if !order.contains(&category) {
                order.push(category);
            }
        }
        Ok(order)
    }

    /// Replace the category order
    ///
    /// The new order must contain exactly the categories currently
    /// referenced by envelopes: no drops, additions, or duplicates.
    pub fn reorder_categories(&self, new_order: &[String]) -> LedgerResult<()> {
        let live: HashSet<String> = self.store.envelopes.categories()?.into_iter().collect();
        let proposed: HashSet<String> = new_order.iter().cloned().collect();

        if proposed.len() != new_order.len() {
            return Err(LedgerError::Validation(
                "Category order contains duplicates".into(),
            ));
        }
        if proposed != live {
            return Err(LedgerError::Validation(
                "Category order must contain exactly the existing categories".into(),
            ));
        }

        let before = self.store.ordering.get()?;
        self.store.ordering.set(new_order.to_vec())?;
        self.store.ordering.save()?;

        self.store.log_update(
            EntityType::Ordering,
            "categories".into(),
            None,
            &before,
            &new_order.to_vec(),
            None,
        )?;

        Ok(())
    }

    /// Reorder the envelopes of one category
    ///
    /// `new_order` must name exactly that category's envelopes. Their
    /// existing global order indices are collected, sorted, and handed
    /// back out in the new relative order, so envelopes of other
    /// categories keep their positions untouched.
    pub fn reorder_envelopes_within_category(
        &self,
        category: &str,
        new_order: &[EnvelopeId],
    ) -> LedgerResult<()> {
        let current = self.store.envelopes.get_by_category(category)?;
        let current_ids: HashSet<EnvelopeId> = current.iter().map(|e| e.id).collect();
        let proposed: HashSet<EnvelopeId> = new_order.iter().copied().collect();

        if proposed.len() != new_order.len() {
            return Err(LedgerError::Validation(
                "Envelope order contains duplicates".into(),
            ));
        }
        if proposed != current_ids {
            return Err(LedgerError::Validation(format!(
                "Envelope order must contain exactly the envelopes of category '{}'",
                category
            )));
        }

        // Renumber only the touched range of the shared counter
        let mut indices: Vec<i64> = current.iter().map(|e| e.order_index).collect();
        indices.sort_unstable();

        for (&id, &index) in new_order.iter().zip(indices.iter()) {
            // current holds every id in new_order, checked above
            if let Some(mut envelope) = self.store.envelopes.get(id)? {
                envelope.order_index = index;
                self.store.envelopes.upsert(envelope)?;
            }
        }
        self.store.envelopes.save()?;

        self.store.log_update(
            EntityType::Ordering,
            format!("envelopes:{}", category),
            None,
            &current.iter().map(|e| e.id.to_string()).collect::<Vec<_>>(),
            &new_order.iter().map(|id| id.to_string()).collect::<Vec<_>>(),
            None,
        )?;

        Ok(())
    }
}
