//! Account service
//!
//! CRUD for accounts. Balances are derived elsewhere (see the balance
//! service); nothing here stores one.

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Account, AccountId, Money};
use crate::storage::LedgerStore;

/// Service for account management
pub struct AccountService<'a> {
    store: &'a LedgerStore,
}

impl<'a> AccountService<'a> {
    pub fn new(store: &'a LedgerStore) -> Self {
        Self { store }
    }

    /// Create a new account
    pub fn create(
        &self,
        name: &str,
        kind: Option<&str>,
        opening: Money,
    ) -> LedgerResult<Account> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::Validation("Account name cannot be empty".into()));
        }

        if self.store.accounts.name_exists(name, None)? {
            return Err(LedgerError::Duplicate {
                entity_type: "Account",
                identifier: name.to_string(),
            });
        }

        let mut account = Account::with_opening(name, opening);
        account.kind = kind.map(|k| k.trim().to_string()).filter(|k| !k.is_empty());

        account
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.store.accounts.upsert(account.clone())?;
        self.store.accounts.save()?;

        self.store.log_create(
            EntityType::Account,
            account.id.to_string(),
            Some(account.name.clone()),
            &account,
        )?;

        Ok(account)
    }

    /// Get an account by ID
    pub fn get(&self, id: AccountId) -> LedgerResult<Option<Account>> {
        self.store.accounts.get(id)
    }

    /// Get an account by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> LedgerResult<Option<Account>> {
        self.store.accounts.get_by_name(name)
    }

    /// All accounts
    pub fn list(&self) -> LedgerResult<Vec<Account>> {
        self.store.accounts.get_all()
    }

    /// Update an account's name, kind, or opening balance
    pub fn update(
        &self,
        id: AccountId,
        name: Option<&str>,
        kind: Option<Option<&str>>,
        opening: Option<Money>,
    ) -> LedgerResult<Account> {
        let mut account = self
            .store
            .accounts
            .get(id)?
            .ok_or_else(|| LedgerError::account_not_found(id.to_string()))?;

        let before = account.clone();

        if let Some(new_name) = name {
            let new_name = new_name.trim();
            if new_name.is_empty() {
                return Err(LedgerError::Validation("Account name cannot be empty".into()));
            }
            if self.store.accounts.name_exists(new_name, Some(id))? {
                return Err(LedgerError::Duplicate {
                    entity_type: "Account",
                    identifier: new_name.to_string(),
                });
            }
            account.name = new_name.to_string();
        }

        if let Some(new_kind) = kind {
            account.kind = new_kind.map(|k| k.trim().to_string()).filter(|k| !k.is_empty());
        }

        if let Some(new_opening) = opening {
            account.opening = new_opening;
        }

        account
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.store.accounts.upsert(account.clone())?;
        self.store.accounts.save()?;

        let diff = if before.opening != account.opening {
            Some(format!("opening: {} -> {}", before.opening, account.opening))
        } else if before.name != account.name {
            Some(format!("name: {} -> {}", before.name, account.name))
        } else {
            None
        };

        self.store.log_update(
            EntityType::Account,
            account.id.to_string(),
            Some(account.name.clone()),
            &before,
            &account,
            diff,
        )?;

        Ok(account)
    }
}
