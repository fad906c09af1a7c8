use bytes::Bytes;
use rustc_hash::FxHashMap;
use tessera_chunk_index::{ChunkRowSkipIndex, ChunkSetInfo};
use tessera_record::BinaryRecord;
use tessera_types::{ChunkId, RowId, ShardVersion};

/// Undecoded payload of one chunk: raw column buffers keyed by column
/// name. Decoding is delegated to the reader layer.
#[derive(Debug, Clone)]
pub struct ChunkData {
    pub chunk_id: ChunkId,
    pub num_rows: i32,
    pub columns: FxHashMap<String, Bytes>,
}

/// Chunk descriptor plus its accompanying skip indexes, as served by
/// [`ColumnStore::chunk_metadata`](crate::ColumnStore::chunk_metadata).
/// The rebuild source for a partition chunk index.
#[derive(Debug, Clone)]
pub struct ChunkMetadata {
    pub info: ChunkSetInfo,
    pub skips: Vec<ChunkRowSkipIndex>,
}

/// One chunked write on the ingest path.
///
/// Carries the raw buffers and the covered row-id range; the writer derives
/// the chunk's descriptor (id and key interval) itself.
#[derive(Debug, Clone)]
pub struct WriteChunkRequest {
    pub dataset: String,
    pub partition: BinaryRecord,
    pub version: ShardVersion,
    pub row_range: (RowId, RowId),
    pub columns: FxHashMap<String, Bytes>,
}
