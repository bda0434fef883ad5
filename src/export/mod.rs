//! Data export
//!
//! CSV for spreadsheet-friendly transaction and envelope listings, JSON
//! and YAML for full-ledger snapshots.

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::{export_envelopes_csv, export_transactions_csv};
pub use json::{export_full_json, FullExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_full_yaml;
