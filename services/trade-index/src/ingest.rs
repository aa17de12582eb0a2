//! Loading transaction records from disk

use crate::platform::{TradingPlatform, TransactionRecord};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{info, warn};

/// Outcome of feeding a batch of records into a platform
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Records stored
    pub accepted: usize,
    /// Records that failed validation
    pub rejected: usize,
}

/// Read a JSON array of transaction records
pub fn load_transactions(path: impl AsRef<Path>) -> Result<Vec<TransactionRecord>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let records: Vec<TransactionRecord> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse transactions in {}", path.display()))?;
    Ok(records)
}

/// Log every record, skipping the ones the platform rejects
pub fn ingest<I>(platform: &mut TradingPlatform, records: I) -> IngestSummary
where
    I: IntoIterator<Item = TransactionRecord>,
{
    let mut summary = IngestSummary::default();
    for record in records {
        match platform.log_transaction(record) {
            Ok(()) => summary.accepted += 1,
            Err(e) => {
                warn!("skipping transaction: {e}");
                summary.rejected += 1;
            }
        }
    }
    info!(
        accepted = summary.accepted,
        rejected = summary.rejected,
        "ingested transactions"
    );
    summary
}
