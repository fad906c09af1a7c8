use roaring::RoaringBitmap;
use tessera_record::BinaryRecord;
use tessera_types::ChunkId;

/// Metadata of one immutable chunk: identity, row count, and the row-key
/// interval its rows cover.
///
/// Created at ingest commit, never mutated, destroyed only when the chunk
/// is compacted away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSetInfo {
    pub chunk_id: ChunkId,
    pub num_rows: i32,
    pub first_key: BinaryRecord,
    pub last_key: BinaryRecord,
}

impl ChunkSetInfo {
    pub fn new(
        chunk_id: ChunkId,
        num_rows: i32,
        first_key: BinaryRecord,
        last_key: BinaryRecord,
    ) -> Self {
        debug_assert!(first_key <= last_key);
        Self {
            chunk_id,
            num_rows,
            first_key,
            last_key,
        }
    }

    /// Overlap of this chunk's key interval with `[lo, hi]`.
    ///
    /// Returns `Some((max(first_key, lo), min(last_key, hi)))` when that
    /// interval is non-empty. The sole geometric primitive used for range
    /// pruning; no false negatives.
    pub fn intersection(
        &self,
        lo: &BinaryRecord,
        hi: &BinaryRecord,
    ) -> Option<(BinaryRecord, BinaryRecord)> {
        if !self.intersects(lo, hi) {
            return None;
        }
        let start = if self.first_key >= *lo {
            self.first_key.clone()
        } else {
            lo.clone()
        };
        let end = if self.last_key <= *hi {
            self.last_key.clone()
        } else {
            hi.clone()
        };
        Some((start, end))
    }

    /// Allocation-free form of [`intersection`](ChunkSetInfo::intersection).
    #[inline]
    pub fn intersects(&self, lo: &BinaryRecord, hi: &BinaryRecord) -> bool {
        self.first_key <= *hi && self.last_key >= *lo
    }
}

/// Row offsets within an older chunk that rows of a newer chunk supersede.
///
/// Produced as a side effect of ingesting the newer chunk; a skip index
/// may only reference chunk ids older than the chunk it accompanies.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkRowSkipIndex {
    /// The older chunk whose rows are overridden.
    pub chunk_id: ChunkId,
    /// Offsets to skip when reading that chunk.
    pub overrides: RoaringBitmap,
}

impl ChunkRowSkipIndex {
    pub fn new(chunk_id: ChunkId, offsets: impl IntoIterator<Item = u32>) -> Self {
        Self {
            chunk_id,
            overrides: offsets.into_iter().collect(),
        }
    }
}
