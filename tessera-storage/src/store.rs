use async_trait::async_trait;
use tessera_catalog::RichProjection;
use tessera_record::BinaryRecord;
use tessera_result::Result;
use tessera_types::{ChunkId, ShardVersion};

use crate::chunk::{ChunkData, ChunkMetadata, WriteChunkRequest};
use crate::split::Split;

/// Narrow interface to the durable chunk backend.
///
/// Reads are synchronous pull calls made as a scan advances; only the
/// ingest-side write is async. The projection parameter supplies the key
/// schemas needed to rehydrate partition keys and chunk descriptors from
/// their stored byte form.
#[async_trait]
pub trait ColumnStore: Send + Sync {
    /// Units of parallel scan work for `dataset`, one batch per node.
    fn get_scan_splits(&self, dataset: &str, splits_per_node: usize) -> Result<Vec<Split>>;

    /// Candidate partition keys covered by `split`.
    fn partitions_in_split(
        &self,
        projection: &RichProjection,
        split: &Split,
    ) -> Result<Vec<BinaryRecord>>;

    /// Chunk descriptors and skip indexes of one partition, the rebuild
    /// source for a partition chunk index.
    fn chunk_metadata(
        &self,
        projection: &RichProjection,
        partition: &BinaryRecord,
        version: ShardVersion,
    ) -> Result<Vec<ChunkMetadata>>;

    /// Raw column buffers of one chunk.
    fn read_chunk(
        &self,
        projection: &RichProjection,
        partition: &BinaryRecord,
        version: ShardVersion,
        chunk_id: ChunkId,
    ) -> Result<ChunkData>;

    /// Persist one chunked write and return its assigned chunk id.
    async fn write_chunk(&self, request: WriteChunkRequest) -> Result<ChunkId>;
}
