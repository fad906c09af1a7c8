//! Column store surface and in-memory backend.
//!
//! The [`ColumnStore`] trait is the narrow interface between the scan/ingest
//! core and the durable chunk backend: split enumeration, per-partition
//! chunk metadata, chunk payload reads, and the async write path. Chunk
//! payloads stay opaque [`bytes::Bytes`]; decoding is delegated to readers
//! above this crate.
//!
//! [`MemColumnStore`] keeps everything in process for tests and single-node
//! use, persisting chunk descriptors as `bitcode` blobs the way a durable
//! backend would. [`FaultInjectingStore`] wraps any store with on-demand
//! write failures so ingest error paths can be exercised.

pub mod chunk;
pub mod fault;
pub mod mem;
pub mod node;
pub mod split;
pub mod store;

pub use chunk::{ChunkData, ChunkMetadata, WriteChunkRequest};
pub use fault::FaultInjectingStore;
pub use mem::MemColumnStore;
pub use node::NodeContext;
pub use split::Split;
pub use store::ColumnStore;
