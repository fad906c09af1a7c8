use std::sync::Arc;

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use tessera_record::BinaryRecord;
use tessera_result::Result;
use tessera_types::ShardVersion;

use crate::dataset::{ColumnDef, Dataset, PartitionRecord, ShardRange};

/// Narrow async interface to the metadata backend.
///
/// Lookups return [`Error::NotFound`](tessera_result::Error::NotFound) for
/// missing entities. `update_partition_shards` appends one shard range
/// under its version; callers invoke it only after the corresponding chunk
/// write has succeeded.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    async fn get_dataset(&self, name: &str) -> Result<Arc<Dataset>>;

    async fn get_schema(
        &self,
        name: &str,
        version: ShardVersion,
    ) -> Result<FxHashMap<String, ColumnDef>>;

    async fn get_partition(
        &self,
        dataset: &str,
        partition: &BinaryRecord,
    ) -> Result<PartitionRecord>;

    async fn update_partition_shards(
        &self,
        dataset: &str,
        partition: &BinaryRecord,
        version: ShardVersion,
        range: ShardRange,
    ) -> Result<()>;
}
