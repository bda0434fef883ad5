//! YAML full-ledger export

use std::io::Write;

use crate::error::{LedgerError, LedgerResult};
use crate::storage::LedgerStore;

use super::json::FullExport;

/// Write the full ledger as YAML
pub fn export_full_yaml<W: Write>(store: &LedgerStore, writer: &mut W) -> LedgerResult<()> {
    let export = FullExport::snapshot(store)?;
    serde_yaml::to_writer(writer, &export).map_err(|e| LedgerError::Export(e.to_string()))?;
    Ok(())
}
