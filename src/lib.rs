//! envelope-ledger - derivation and transfer engine for a budgeting ledger
//!
//! Users record dated money movements against accounts and classify
//! spending into envelopes (budget categories with a monthly target).
//! Every balance shown to a user (account balances, envelope
//! available-to-spend with cross-month rollover, monthly and
//! year-to-date totals) is derived on demand from the transaction log
//! plus a small set of configuration records. Nothing stores a balance.
//!
//! # Architecture
//!
//! - `config`: data-directory path resolution
//! - `error`: the engine's error type
//! - `models`: entities, ids, money, and calendar months
//! - `storage`: the ledger store (in-memory collections with JSON
//!   persistence and the audit log)
//! - `services`: balance derivation, allocation resolution, the
//!   transaction writer, the transfer orchestrator, ordering, and
//!   entity CRUD
//! - `audit`: append-only JSONL audit logging
//! - `export`: CSV/JSON/YAML exports
//!
//! # Example
//!
//! ```rust,ignore
//! use envelope_ledger::config::LedgerPaths;
//! use envelope_ledger::storage::LedgerStore;
//! use envelope_ledger::services::BalanceService;
//!
//! let store = LedgerStore::open(LedgerPaths::new()?)?;
//! store.load_all()?;
//! let balance = BalanceService::new(&store).account_balance(account_id)?;
//! ```

pub mod audit;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
