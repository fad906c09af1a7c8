use std::sync::Arc;

use roaring::RoaringBitmap;
use rustc_hash::FxHashMap;
use tessera_types::ChunkId;

use crate::info::ChunkRowSkipIndex;

/// Shared per-partition skip bookkeeping: chunk id → ordered set of row
/// offsets superseded by later chunks.
///
/// Merging is a set union, so re-adding the same skip index is harmless.
/// Entries may reference chunk ids not (yet) present in the owning index;
/// they surface only once the target chunk is added, which lets an index
/// be rebuilt from backend metadata in any order.
#[derive(Debug, Default)]
pub struct SkipMap {
    entries: FxHashMap<ChunkId, RoaringBitmap>,
}

impl SkipMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union `skip.overrides` into the target chunk's entry.
    pub fn merge(&mut self, skip: &ChunkRowSkipIndex) {
        *self.entries.entry(skip.chunk_id).or_default() |= &skip.overrides;
    }

    /// Materialize the ascending, de-duplicated offset array for `id`.
    pub fn offsets(&self, id: ChunkId) -> Arc<[u32]> {
        self.entries
            .get(&id)
            .map(|bitmap| bitmap.iter().collect::<Vec<u32>>())
            .unwrap_or_default()
            .into()
    }

    /// Raw bitmap access for executor-side membership tests.
    pub fn bitmap(&self, id: ChunkId) -> Option<&RoaringBitmap> {
        self.entries.get(&id)
    }
}
