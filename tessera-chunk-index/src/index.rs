use std::sync::Arc;

use tessera_record::BinaryRecord;
use tessera_types::ChunkId;

use crate::info::{ChunkRowSkipIndex, ChunkSetInfo};

/// Items emitted by index queries: a chunk descriptor plus the ascending
/// array of row offsets to skip when reading it.
pub type ChunkAndSkips<'a> = (&'a ChunkSetInfo, Arc<[u32]>);

/// Query surface shared by both chunk-index implementations.
///
/// Implementations differ only in container ordering and therefore in the
/// emission order of their iterators; the set of emitted chunks is
/// identical for identical mutations.
pub trait PartitionChunkIndex {
    /// Insert `info` and union its accompanying skip indexes into the
    /// partition's skip bookkeeping. Skips may only reference chunk ids
    /// older than `info.chunk_id`; re-adding a skip set is idempotent.
    fn add(&mut self, info: ChunkSetInfo, skips: &[ChunkRowSkipIndex]);

    /// Number of chunks currently indexed.
    fn num_chunks(&self) -> usize;

    /// Every indexed chunk, in the implementation's native order.
    fn all_chunks(&self) -> Box<dyn Iterator<Item = ChunkAndSkips<'_>> + '_>;

    /// Chunks whose key interval intersects `[lo, hi]`; no false
    /// negatives.
    fn row_key_range(
        &self,
        lo: &BinaryRecord,
        hi: &BinaryRecord,
    ) -> Box<dyn Iterator<Item = ChunkAndSkips<'_>> + '_>;

    /// Identity lookup: zero-or-one item for `(first_key, id)`.
    fn single_chunk(
        &self,
        first_key: &BinaryRecord,
        id: ChunkId,
    ) -> Box<dyn Iterator<Item = ChunkAndSkips<'_>> + '_>;
}
