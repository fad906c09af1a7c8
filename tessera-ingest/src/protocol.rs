use bytes::Bytes;
use rustc_hash::FxHashMap;
use tessera_record::BinaryRecord;
use tessera_types::{RowId, ShardVersion};

/// Commands accepted by a running ingester.
#[derive(Debug, Clone)]
pub enum IngestCommand {
    /// One chunk of columnar data covering `row_range`, acknowledged as
    /// `ack_row` once durable.
    ChunkedColumns {
        version: ShardVersion,
        row_range: (RowId, RowId),
        ack_row: RowId,
        columns: FxHashMap<String, Bytes>,
    },
    /// Shut the ingester down. Queued chunks ahead of the `Stop` in the
    /// mailbox are still processed and acknowledged; everything behind it
    /// is dropped.
    Stop,
}

/// Responses emitted to the ingester's parent.
///
/// The first event is always one of the startup outcomes
/// (`NoDatasetColumns`, `NotFound`, `UndefinedColumns`, `GoodToGo`);
/// afterwards every submitted chunk produces exactly one `Ack` or
/// `ShardingError`.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestProtocol {
    /// The dataset is unknown, defines no columns, or the requested
    /// column set is empty.
    NoDatasetColumns { dataset: String },
    /// The partition does not exist.
    NotFound,
    /// Requested column names the dataset does not define.
    UndefinedColumns {
        dataset: String,
        missing: Vec<String>,
    },
    /// Validation passed; the ingester accepts chunks.
    GoodToGo {
        dataset: String,
        partition: BinaryRecord,
    },
    /// The chunk was accepted and persisted.
    Ack {
        dataset: String,
        partition: BinaryRecord,
        row_id: RowId,
    },
    /// The chunk was rejected or its write failed; the ingester stays
    /// ready and the caller decides whether to retry.
    ShardingError {
        dataset: String,
        partition: BinaryRecord,
        row_id: RowId,
    },
}
