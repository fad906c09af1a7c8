//! Scan executor.
//!
//! Translates a compiled [`ScanPlan`](tessera_plan::ScanPlan) into a lazy,
//! finite stream of rows: partitions are resolved per the plan's
//! enumeration strategy, each selected partition materializes a chunk
//! index from backend metadata as the scan reaches it, and rows whose
//! offsets appear in a chunk's skip array are filtered out. Row decoding
//! is delegated to a [`RowReaderFactory`]; the executor interprets no
//! predicates beyond the residual partition function handed to it.

pub mod execute;
pub mod reader;

pub use execute::{RowScan, scan_rows};
pub use reader::{RowReaderFactory, ScanRow};

use tessera_plan::PartitionPredicate;
use tessera_record::BinaryRecord;
use tessera_storage::Split;

/// Partition selection handed to the executor, split already resolved.
///
/// `Single` and `Multi` come straight from the plan; a
/// [`PartitionScanPlan::Filtered`](tessera_plan::PartitionScanPlan)
/// becomes one `Filtered` method per backend split.
#[derive(Debug, Clone)]
pub enum PartitionScanMethod {
    Single(BinaryRecord),
    Multi(Vec<BinaryRecord>),
    Filtered(Split, PartitionPredicate),
}
