//! Tessera: partition chunk index and chunk-scan planner for a columnar
//! time-series store.
//!
//! This crate is the single entrypoint for the workspace, re-exporting the
//! public surface of the underlying `tessera-*` crates.
//!
//! Data is organized by `(dataset, partition key)` into ordered sets of
//! immutable chunks. Each hot partition carries an in-memory
//! [`PartitionChunkIndex`](chunk_index::PartitionChunkIndex) mapping chunk
//! descriptors to the row offsets superseded by later chunks. Queries
//! arrive as flat [`Filter`](expr::Filter) lists; the
//! [`planner`](plan::compile) groups them by key-column role, enumerates
//! partitions (or falls back to a filtered full scan with a residual
//! predicate), derives a row-key interval for chunk pruning, and the
//! [`scan executor`](scan::scan_rows) streams surviving rows lazily.
//!
//! On the write side, one [`PartitionIngester`](ingest::PartitionIngester)
//! per `(dataset, partition, columns)` validates its setup against the
//! metadata store, accepts chunked column buffers, updates shard
//! bookkeeping after each durable write, and acknowledges every chunk
//! exactly once.
//!
//! ```no_run
//! use std::sync::Arc;
//! use tessera::catalog::{Dataset, ColumnDef, RichProjection};
//! use tessera::expr::Filter;
//! use tessera::plan::{PlannerConfig, compile};
//! use tessera::types::KeyType;
//!
//! # fn main() -> tessera::result::Result<()> {
//! let dataset = Arc::new(Dataset::new(
//!     "gdelt",
//!     vec!["monthYear"],
//!     vec!["id"],
//!     vec![
//!         ColumnDef::new("monthYear", KeyType::Utf8),
//!         ColumnDef::new("id", KeyType::Long),
//!     ],
//! ));
//! let projection = RichProjection::new(dataset)?;
//! let filters = vec![Filter::eq("monthYear", "1979-1984")];
//! let plan = compile(&filters, &projection, &PlannerConfig::default())?;
//! # let _ = plan;
//! # Ok(())
//! # }
//! ```

pub use tessera_catalog as catalog;
pub use tessera_chunk_index as chunk_index;
pub use tessera_expr as expr;
pub use tessera_ingest as ingest;
pub use tessera_plan as plan;
pub use tessera_record as record;
pub use tessera_result as result;
pub use tessera_scan as scan;
pub use tessera_storage as storage;
pub use tessera_types as types;
