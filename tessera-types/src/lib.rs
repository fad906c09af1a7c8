//! Common identifier and key types for the Tessera toolkit.
//!
//! This crate hosts the scalar vocabulary used throughout the system,
//! decoupled from the filter AST (`tessera-expr`) and the binary record
//! codec (`tessera-record`): stable id aliases, the closed [`KeyType`]
//! registry, and the deferred-typing [`KeyValue`] literal.

pub mod ids;
pub mod key;

pub use ids::{ChunkId, RowId, ShardVersion};
pub use key::{KeyType, KeyValue};
