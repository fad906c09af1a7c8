//! Predicate-to-scan-plan compiler.
//!
//! The planner consumes a flat list of filter expressions plus a
//! [`RichProjection`](tessera_catalog::RichProjection) and emits a
//! [`ScanPlan`]: a partition enumeration strategy and a chunk-pruning
//! method. Pushdown is the compiler's whole responsibility; the executor
//! never re-interprets filters.
//!
//! Recoverable degradations (gapped row-key prefixes, partition products
//! above the configured cap) never fail the query: the compiler logs a
//! diagnostic and selects the conservative plan. Genuinely uninterpretable
//! inputs (range filters on partition columns, literals that do not parse
//! as their column's key type) are errors.

pub mod config;
pub mod plan;
pub mod planner;

pub use config::PlannerConfig;
pub use plan::{ChunkScanMethod, PartitionPredicate, PartitionScanPlan, ScanPlan};
pub use planner::compile;
