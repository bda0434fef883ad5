//! Configuration for the ledger engine

pub mod paths;

pub use paths::LedgerPaths;
