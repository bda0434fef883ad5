//! Payee service
//!
//! CRUD for payees plus the idempotent resolve-or-create used when
//! transfers need their synthetic counterparty.

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Payee, PayeeId};
use crate::storage::LedgerStore;

/// Service for payee management
pub struct PayeeService<'a> {
    store: &'a LedgerStore,
}

impl<'a> PayeeService<'a> {
    pub fn new(store: &'a LedgerStore) -> Self {
        Self { store }
    }

    /// Create a new payee
    pub fn create(&self, name: &str, category: Option<&str>) -> LedgerResult<Payee> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::Validation("Payee name cannot be empty".into()));
        }

        if self.store.payees.get_by_name(name)?.is_some() {
            return Err(LedgerError::Duplicate {
                entity_type: "Payee",
                identifier: name.to_string(),
            });
        }

        let mut payee = Payee::new(name);
        payee.category = category.map(|c| c.trim().to_string()).filter(|c| !c.is_empty());

        payee
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.store.payees.upsert(payee.clone())?;
        self.store.payees.save()?;

        self.store.log_create(
            EntityType::Payee,
            payee.id.to_string(),
            Some(payee.name.clone()),
            &payee,
        )?;

        Ok(payee)
    }

    /// Get a payee by ID
    pub fn get(&self, id: PayeeId) -> LedgerResult<Option<Payee>> {
        self.store.payees.get(id)
    }

    /// Get a payee by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> LedgerResult<Option<Payee>> {
        self.store.payees.get_by_name(name)
    }

    /// All payees
    pub fn list(&self) -> LedgerResult<Vec<Payee>> {
        self.store.payees.get_all()
    }

    /// Look a payee up by name, creating it when absent
    ///
    /// Lookup is case-insensitive, so repeated calls with the same name
    /// always resolve to one payee.
    pub fn resolve_or_create(&self, name: &str) -> LedgerResult<Payee> {
        if let Some(existing) = self.store.payees.get_by_name(name)? {
            return Ok(existing);
        }
        self.create(name, None)
    }

    /// Update a payee's name or category
    pub fn update(
        &self,
        id: PayeeId,
        name: Option<&str>,
        category: Option<Option<&str>>,
    ) -> LedgerResult<Payee> {
        let mut payee = self
            .store
            .payees
            .get(id)?
            .ok_or_else(|| LedgerError::payee_not_found(id.to_string()))?;

        let before = payee.clone();

        if let Some(new_name) = name {
            let new_name = new_name.trim();
            if new_name.is_empty() {
                return Err(LedgerError::Validation("Payee name cannot be empty".into()));
            }
            if let Some(other) = self.store.payees.get_by_name(new_name)? {
                if other.id != id {
                    return Err(LedgerError::Duplicate {
                        entity_type: "Payee",
                        identifier: new_name.to_string(),
                    });
                }
            }
            payee.name = new_name.to_string();
        }

        if let Some(new_category) = category {
            payee.category = new_category.map(|c| c.trim().to_string()).filter(|c| !c.is_empty());
        }

        payee
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.store.payees.upsert(payee.clone())?;
        self.store.payees.save()?;

        let diff = if before.name != payee.name {
            Some(format!("name: {} -> {}", before.name, payee.name))
        } else {
            None
        };

        self.store.log_update(
            EntityType::Payee,
            payee.id.to_string(),
            Some(payee.name.clone()),
            &before,
            &payee,
            diff,
        )?;

        Ok(payee)
    }
}
