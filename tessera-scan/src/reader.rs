use tessera_catalog::RichProjection;
use tessera_record::BinaryRecord;
use tessera_result::Result;
use tessera_storage::ChunkData;
use tessera_types::ChunkId;

/// Delegated chunk decoder.
///
/// Implementations turn one chunk's raw column buffers into a row
/// iterator; rows must come out in offset order starting at zero, one per
/// stored row, so the executor can pair them with skip offsets. The
/// executor owns skip filtering; readers decode unconditionally.
pub trait RowReaderFactory {
    type Row;

    fn open(
        &self,
        projection: &RichProjection,
        chunk: &ChunkData,
    ) -> Result<Box<dyn Iterator<Item = Result<Self::Row>> + Send>>;
}

/// One emitted row with its provenance.
#[derive(Debug, Clone)]
pub struct ScanRow<R> {
    pub partition: BinaryRecord,
    pub chunk_id: ChunkId,
    pub offset: u32,
    pub row: R,
}
