use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use tessera_record::BinaryRecord;
use tessera_result::{Error, Result};
use tessera_types::ShardVersion;

use crate::dataset::{ColumnDef, Dataset, PartitionRecord, ShardRange};
use crate::store::MetadataStore;

/// In-memory metadata store for tests and single-node deployments.
///
/// Datasets and partitions live behind independent `RwLock`s; the async
/// trait methods never hold a lock across an await point.
#[derive(Default)]
pub struct MemMetaStore {
    datasets: RwLock<FxHashMap<String, Arc<Dataset>>>,
    partitions: RwLock<FxHashMap<PartitionKey, PartitionRecord>>,
}

type PartitionKey = (String, Vec<u8>);

impl MemMetaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_dataset(&self, dataset: Dataset) {
        let mut map = self.datasets.write().expect("dataset lock poisoned");
        map.insert(dataset.name.clone(), Arc::new(dataset));
    }

    pub fn create_partition(&self, dataset: &str, partition: BinaryRecord) {
        let key = (dataset.to_string(), partition.as_bytes().to_vec());
        let record = PartitionRecord::new(dataset, partition);
        let mut map = self.partitions.write().expect("partition lock poisoned");
        map.insert(key, record);
    }
}

#[async_trait]
impl MetadataStore for MemMetaStore {
    async fn get_dataset(&self, name: &str) -> Result<Arc<Dataset>> {
        let map = self.datasets.read().expect("dataset lock poisoned");
        map.get(name).cloned().ok_or(Error::NotFound)
    }

    async fn get_schema(
        &self,
        name: &str,
        _version: ShardVersion,
    ) -> Result<FxHashMap<String, ColumnDef>> {
        let map = self.datasets.read().expect("dataset lock poisoned");
        map.get(name).map(|d| d.schema()).ok_or(Error::NotFound)
    }

    async fn get_partition(
        &self,
        dataset: &str,
        partition: &BinaryRecord,
    ) -> Result<PartitionRecord> {
        let key = (dataset.to_string(), partition.as_bytes().to_vec());
        let map = self.partitions.read().expect("partition lock poisoned");
        map.get(&key).cloned().ok_or(Error::NotFound)
    }

    async fn update_partition_shards(
        &self,
        dataset: &str,
        partition: &BinaryRecord,
        version: ShardVersion,
        range: ShardRange,
    ) -> Result<()> {
        let key = (dataset.to_string(), partition.as_bytes().to_vec());
        let mut map = self.partitions.write().expect("partition lock poisoned");
        let record = map.get_mut(&key).ok_or(Error::NotFound)?;
        record.shard_versions.entry(version).or_default().push(range);
        Ok(())
    }
}
