use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use tessera_record::BinaryRecord;
use tessera_types::{KeyType, RowId, ShardVersion};

/// Declared column of a dataset: a name plus its key-type tag.
///
/// Every column carries a [`KeyType`] even when it never participates in a
/// key; the tag doubles as the column's logical type for schema checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub col_type: KeyType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, col_type: KeyType) -> Self {
        Self {
            name: name.into(),
            col_type,
        }
    }
}

/// Dataset definition: columns plus the declared partition/row key layout.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub name: String,
    /// Ordered partition-key column names.
    pub partition_columns: Vec<String>,
    /// Ordered row-key column names.
    pub row_key_columns: Vec<String>,
    /// All declared columns, key columns included.
    pub columns: Vec<ColumnDef>,
}

impl Dataset {
    pub fn new(
        name: impl Into<String>,
        partition_columns: Vec<&str>,
        row_key_columns: Vec<&str>,
        columns: Vec<ColumnDef>,
    ) -> Self {
        Self {
            name: name.into(),
            partition_columns: partition_columns.into_iter().map(String::from).collect(),
            row_key_columns: row_key_columns.into_iter().map(String::from).collect(),
            columns,
        }
    }

    /// Look up one declared column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column-name → definition map, the `get_schema` payload shape.
    pub fn schema(&self) -> FxHashMap<String, ColumnDef> {
        self.columns
            .iter()
            .map(|c| (c.name.clone(), c.clone()))
            .collect()
    }
}

/// Row-id range covered by one accepted ingest chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardRange {
    pub first_row: RowId,
    pub last_row: RowId,
}

/// Per-partition bookkeeping held by the metadata store.
///
/// `shard_versions` maps each shard version to the ranges ingested under
/// it, appended in acceptance order. The map is only mutated after a chunk
/// write has succeeded, so a concurrent `get_partition` always observes a
/// consistent snapshot.
#[derive(Debug, Clone)]
pub struct PartitionRecord {
    pub dataset: String,
    pub partition_key: BinaryRecord,
    pub shard_versions: BTreeMap<ShardVersion, Vec<ShardRange>>,
}

impl PartitionRecord {
    pub fn new(dataset: impl Into<String>, partition_key: BinaryRecord) -> Self {
        Self {
            dataset: dataset.into(),
            partition_key,
            shard_versions: BTreeMap::new(),
        }
    }

    /// Total number of shard entries across all versions.
    pub fn num_shard_entries(&self) -> usize {
        self.shard_versions.values().map(Vec::len).sum()
    }
}
