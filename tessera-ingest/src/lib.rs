//! Per-partition ingester controller.
//!
//! One controller owns one `(dataset, partition, column-subset)` ingest
//! stream. It validates its setup against the metadata store before
//! accepting anything, then processes chunked column writes from its
//! mailbox one at a time: forward buffers to the writer, record the shard
//! range, acknowledge. Exactly one response is emitted per submitted
//! chunk, in acceptance order.
//!
//! Stopping is graceful up to a bounded window; past the bound the task
//! is aborted and pending chunks get no acknowledgement.

pub mod controller;
pub mod protocol;

pub use controller::{IngesterConfig, IngesterHandle, PartitionIngester};
pub use protocol::{IngestCommand, IngestProtocol};
