//! Business logic layer
//!
//! Each service borrows the ledger store; derivation services are pure
//! reads, the rest are the engine's write paths.

pub mod account;
pub mod allocation;
pub mod balance;
pub mod envelope;
pub mod ordering;
pub mod payee;
pub mod transaction;
pub mod transfer;

pub use account::AccountService;
pub use allocation::AllocationService;
pub use balance::BalanceService;
pub use envelope::EnvelopeService;
pub use ordering::OrderingService;
pub use payee::PayeeService;
pub use transaction::{NewTransaction, TransactionPatch, TransactionService};
pub use transfer::{
    TransferResult, TransferService, ACCOUNT_TRANSFER_PAYEE, BUDGET_TRANSFER_PAYEE,
};
