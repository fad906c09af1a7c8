//! Identifiers shared across Tessera crates.
//!
//! These aliases live in `tessera-types` so they can be reused without
//! depending on the storage-specific crates.

/// Identifier of an immutable chunk within one partition.
///
/// Chunk ids are assigned monotonically at ingest commit and never reused.
/// `ChunkId::MAX` is reserved as the upper-bound tiebreaker for range
/// sub-maps in the row-key-ordered chunk index and is never a legal id.
pub type ChunkId = u64;

/// Row identifier within an ingest stream. Signed to match the wire
/// protocol, where `-1` marks "nothing acknowledged yet".
pub type RowId = i64;

/// Shard version under which a chunk was written. Non-negative for any
/// accepted write.
pub type ShardVersion = i32;
