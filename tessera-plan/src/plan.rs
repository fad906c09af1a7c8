use std::fmt;
use std::sync::Arc;

use tessera_record::BinaryRecord;

/// Compiled scan plan: how to enumerate partitions and which chunks to
/// read within each.
#[derive(Debug, Clone)]
pub struct ScanPlan {
    pub partitions: PartitionScanPlan,
    pub chunks: ChunkScanMethod,
}

/// Partition enumeration strategy.
#[derive(Debug, Clone)]
pub enum PartitionScanPlan {
    /// Exactly one partition key.
    Single(BinaryRecord),
    /// An explicit list of partition keys, read in order.
    Multi(Vec<BinaryRecord>),
    /// Scan all partitions (split by split) and keep those passing the
    /// residual predicate.
    Filtered(PartitionPredicate),
}

/// Chunk selection within a partition.
#[derive(Debug, Clone)]
pub enum ChunkScanMethod {
    /// Read every chunk.
    All,
    /// Read chunks whose key interval intersects `[first, last]`.
    RowKeyRange(BinaryRecord, BinaryRecord),
}

/// Residual partition-key predicate for filtered scans.
///
/// `is_filtered() == false` marks the constant-true predicate of an
/// unfiltered full scan, letting executors and diagnostics distinguish
/// "no predicates survived" from "predicates compiled".
#[derive(Clone)]
pub struct PartitionPredicate {
    func: Arc<dyn Fn(&BinaryRecord) -> bool + Send + Sync>,
    filtered: bool,
}

impl PartitionPredicate {
    pub fn new(func: impl Fn(&BinaryRecord) -> bool + Send + Sync + 'static) -> Self {
        Self {
            func: Arc::new(func),
            filtered: true,
        }
    }

    /// The constant-true predicate of an unfiltered scan.
    pub fn match_all() -> Self {
        Self {
            func: Arc::new(|_| true),
            filtered: false,
        }
    }

    #[inline]
    pub fn matches(&self, key: &BinaryRecord) -> bool {
        (self.func)(key)
    }

    #[inline]
    pub fn is_filtered(&self) -> bool {
        self.filtered
    }
}

impl fmt::Debug for PartitionPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartitionPredicate")
            .field("filtered", &self.filtered)
            .finish_non_exhaustive()
    }
}
