use std::collections::BTreeMap;
use std::sync::Arc;

use tessera_record::BinaryRecord;
use tessera_types::ChunkId;

use crate::index::{ChunkAndSkips, PartitionChunkIndex};
use crate::info::{ChunkRowSkipIndex, ChunkSetInfo};
use crate::skip::SkipMap;

#[derive(Debug)]
struct Entry {
    info: ChunkSetInfo,
    /// Materialized skip array, refreshed whenever a later chunk adds
    /// overrides targeting this one.
    skips: Arc<[u32]>,
}

/// Chunk index ordered by chunk id, which approximates ingest order.
///
/// `row_key_range` is a linear scan filtered by interval intersection;
/// the win is that each chunk's skip array is cached next to its
/// descriptor, so full-partition and recency-ordered reads pay no
/// per-emission materialization. `add` refreshes only the caches of the
/// *target* older chunks named by the incoming skips.
#[derive(Debug, Default)]
pub struct ChunkIdChunkIndex {
    chunks: BTreeMap<ChunkId, Entry>,
    skips: SkipMap,
}

impl ChunkIdChunkIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PartitionChunkIndex for ChunkIdChunkIndex {
    fn add(&mut self, info: ChunkSetInfo, skips: &[ChunkRowSkipIndex]) {
        debug_assert!(info.chunk_id != ChunkId::MAX);
        for skip in skips {
            debug_assert!(skip.chunk_id < info.chunk_id);
            self.skips.merge(skip);
            if let Some(entry) = self.chunks.get_mut(&skip.chunk_id) {
                entry.skips = self.skips.offsets(skip.chunk_id);
            }
        }
        // Offsets already recorded against this id (out-of-order rebuild)
        // become visible immediately.
        let cached = self.skips.offsets(info.chunk_id);
        self.chunks.insert(
            info.chunk_id,
            Entry {
                info,
                skips: cached,
            },
        );
    }

    fn num_chunks(&self) -> usize {
        self.chunks.len()
    }

    fn all_chunks(&self) -> Box<dyn Iterator<Item = ChunkAndSkips<'_>> + '_> {
        Box::new(
            self.chunks
                .values()
                .map(|entry| (&entry.info, Arc::clone(&entry.skips))),
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
                .values()
                .filter(move |entry| entry.info.intersects(&lo, &hi))
                .map(|entry| (&entry.info, Arc::clone(&entry.skips))),
        )
    }

    fn single_chunk(
        &self,
        first_key: &BinaryRecord,
        id: ChunkId,
    ) -> Box<dyn Iterator<Item = ChunkAndSkips<'_>> + '_> {
        let first_key = first_key.clone();
        Box::new(
            self.chunks
                .get(&id)
                .filter(move |entry| entry.info.first_key == first_key)
                .into_iter()
                .map(|entry| (&entry.info, Arc::clone(&entry.skips))),
        )
    }
}
