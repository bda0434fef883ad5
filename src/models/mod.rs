//! Core data models for the ledger engine

pub mod account;
pub mod allocation;
pub mod envelope;
pub mod ids;
pub mod money;
pub mod month;
pub mod payee;
pub mod transaction;

pub use account::{Account, AccountValidationError};
pub use allocation::{AllocationValidationError, MonthlyAllocation};
pub use envelope::{Envelope, EnvelopeValidationError};
pub use ids::{AccountId, EnvelopeId, PayeeId, TransactionId, TransferId};
pub use money::{Money, MoneyParseError};
pub use month::{Month, MonthParseError};
pub use payee::{Payee, PayeeValidationError};
pub use transaction::{Transaction, TransactionKind, TransactionValidationError};
