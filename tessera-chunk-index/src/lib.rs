//! Per-partition chunk metadata index with row-skip tracking.
//!
//! Each hot partition owns one index instance mapping its immutable chunks
//! ([`ChunkSetInfo`]) to the row offsets superseded by later chunks
//! ([`ChunkRowSkipIndex`]). Two implementations satisfy the same
//! [`PartitionChunkIndex`] contract:
//!
//! - [`RowKeyChunkIndex`] orders chunks by `(first_key, chunk_id)` and
//!   prunes range scans through an ordered sub-map view. Preferred when
//!   scans are range-heavy.
//! - [`ChunkIdChunkIndex`] orders chunks by id (≈ ingest order) and keeps
//!   the materialized skip array cached next to each chunk. Preferred for
//!   full-partition or recency-ordered access.
//!
//! Iteration is lazy, finite, restartable, and stable across calls until
//! the next mutation.

pub mod chunkid;
pub mod index;
pub mod info;
pub mod rowkey;
pub mod skip;

pub use chunkid::ChunkIdChunkIndex;
pub use index::PartitionChunkIndex;
pub use info::{ChunkRowSkipIndex, ChunkSetInfo};
pub use rowkey::RowKeyChunkIndex;
pub use skip::SkipMap;
