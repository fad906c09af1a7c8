use std::collections::BTreeMap;

use tessera_record::BinaryRecord;
use tessera_types::ChunkId;

use crate::index::{ChunkAndSkips, PartitionChunkIndex};
use crate::info::{ChunkRowSkipIndex, ChunkSetInfo};
use crate::skip::SkipMap;

/// Chunk index ordered by `(first_key, chunk_id)`.
///
/// `row_key_range` prunes through the ordered head sub-map up to
/// `(hi, ChunkId::MAX)` and filters the remainder by interval
/// intersection, so range-heavy scans touch only a prefix of the
/// container. Emission order is ascending `(first_key, chunk_id)`.
#[derive(Debug, Default)]
pub struct RowKeyChunkIndex {
    chunks: BTreeMap<(BinaryRecord, ChunkId), ChunkSetInfo>,
    skips: SkipMap,
}

impl RowKeyChunkIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PartitionChunkIndex for RowKeyChunkIndex {
    fn add(&mut self, info: ChunkSetInfo, skips: &[ChunkRowSkipIndex]) {
        // ChunkId::MAX is the range sub-map sentinel, never a legal id.
        debug_assert!(info.chunk_id != ChunkId::MAX);
        for skip in skips {
            debug_assert!(skip.chunk_id < info.chunk_id);
            self.skips.merge(skip);
        }
        self.chunks
            .insert((info.first_key.clone(), info.chunk_id), info);
    }

    fn num_chunks(&self) -> usize {
        self.chunks.len()
    }

    fn all_chunks(&self) -> Box<dyn Iterator<Item = ChunkAndSkips<'_>> + '_> {
        Box::new(
            self.chunks
                .values()
                .map(|info| (info, self.skips.offsets(info.chunk_id))),
        )
    }

    fn row_key_range(
        &self,
        lo: &BinaryRecord,
        hi: &BinaryRecord,
    ) -> Box<dyn Iterator<Item = ChunkAndSkips<'_>> + '_> {
        let lo = lo.clone();
        let hi = hi.clone();
        Box::new(
            self.chunks
                .range(..=(hi.clone(), ChunkId::MAX))
                .map(|(_, info)| info)
                .filter(move |info| info.intersects(&lo, &hi))
                .map(|info| (info, self.skips.offsets(info.chunk_id))),
        )
    }

    fn single_chunk(
        &self,
        first_key: &BinaryRecord,
        id: ChunkId,
    ) -> Box<dyn Iterator<Item = ChunkAndSkips<'_>> + '_> {
        Box::new(
            self.chunks
                .get(&(first_key.clone(), id))
                .into_iter()
                .map(move |info| (info, self.skips.offsets(id))),
        )
    }
}
