use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::sync::RwLock;

use async_trait::async_trait;
use bitcode::{Decode, Encode};
use bytes::Bytes;
use rustc_hash::{FxHashMap, FxHasher};
use tessera_catalog::RichProjection;
use tessera_chunk_index::{ChunkRowSkipIndex, ChunkSetInfo};
use tessera_record::{BinaryRecord, RecordSchema};
use tessera_result::{Error, Result};
use tessera_types::{ChunkId, KeyType, ShardVersion};

use crate::chunk::{ChunkData, ChunkMetadata, WriteChunkRequest};
use crate::split::Split;
use crate::store::ColumnStore;

// Stored form of a chunk descriptor. Keys are kept as raw record bytes;
// the projection supplies the schema to rehydrate them on read.
#[derive(Debug, Clone, Encode, Decode)]
struct ChunkDescriptorBlob {
    chunk_id: ChunkId,
    num_rows: i32,
    first_key: Vec<u8>,
    last_key: Vec<u8>,
    skips: Vec<(ChunkId, Vec<u32>)>,
}

#[derive(Debug, Default)]
struct StoredChunk {
    descriptor: Vec<u8>,
    columns: FxHashMap<String, Bytes>,
}

#[derive(Debug, Default)]
struct PartitionChunks {
    next_chunk_id: ChunkId,
    versions: FxHashMap<ShardVersion, BTreeMap<ChunkId, StoredChunk>>,
}

#[derive(Debug, Default)]
struct DatasetChunks {
    partitions: FxHashMap<Vec<u8>, PartitionChunks>,
}

/// In-memory column store for tests and single-node deployments.
///
/// Chunk descriptors are serialized to `bitcode` blobs exactly as a durable
/// backend would persist them; reads decode through the caller's
/// projection. The write path derives each chunk's key interval from the
/// covered row-id range, which matches datasets whose declared row key is
/// a single long column; fixtures with richer row keys seed descriptors
/// directly through [`MemColumnStore::append_chunk`].
#[derive(Default)]
pub struct MemColumnStore {
    datasets: RwLock<FxHashMap<String, DatasetChunks>>,
}

impl MemColumnStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed one chunk with an explicit descriptor and skip set. Test and
    /// fixture seam; the ingest path goes through
    /// [`ColumnStore::write_chunk`].
    pub fn append_chunk(
        &self,
        dataset: &str,
        partition: &BinaryRecord,
        version: ShardVersion,
        info: ChunkSetInfo,
        skips: Vec<ChunkRowSkipIndex>,
        columns: FxHashMap<String, Bytes>,
    ) {
        let blob = ChunkDescriptorBlob {
            chunk_id: info.chunk_id,
            num_rows: info.num_rows,
            first_key: info.first_key.as_bytes().to_vec(),
            last_key: info.last_key.as_bytes().to_vec(),
            skips: skips
                .iter()
                .map(|s| (s.chunk_id, s.overrides.iter().collect()))
                .collect(),
        };
        let mut datasets = self.datasets.write().expect("store lock poisoned");
        let partition_chunks = datasets
            .entry(dataset.to_string())
            .or_default()
            .partitions
            .entry(partition.as_bytes().to_vec())
            .or_default();
        partition_chunks.next_chunk_id = partition_chunks.next_chunk_id.max(info.chunk_id + 1);
        partition_chunks.versions.entry(version).or_default().insert(
            info.chunk_id,
            StoredChunk {
                descriptor: bitcode::encode(&blob),
                columns,
            },
        );
    }

    fn decode_descriptor(
        blob: &[u8],
        row_key_schema: &std::sync::Arc<RecordSchema>,
    ) -> Result<ChunkMetadata> {
        let blob: ChunkDescriptorBlob = bitcode::decode(blob)
            .map_err(|e| Error::Internal(format!("chunk descriptor blob corrupted: {e}")))?;
        let first_key = BinaryRecord::from_bytes(row_key_schema, Bytes::from(blob.first_key))?;
        let last_key = BinaryRecord::from_bytes(row_key_schema, Bytes::from(blob.last_key))?;
        Ok(ChunkMetadata {
            info: ChunkSetInfo::new(blob.chunk_id, blob.num_rows, first_key, last_key),
            skips: blob
                .skips
                .into_iter()
                .map(|(id, offsets)| ChunkRowSkipIndex::new(id, offsets))
                .collect(),
        })
    }
}

fn split_bucket(partition_bytes: &[u8], of: u32) -> u32 {
    let mut hasher = FxHasher::default();
    partition_bytes.hash(&mut hasher);
    (hasher.finish() % u64::from(of)) as u32
}

#[async_trait]
impl ColumnStore for MemColumnStore {
    fn get_scan_splits(&self, _dataset: &str, splits_per_node: usize) -> Result<Vec<Split>> {
        let of = splits_per_node.max(1) as u32;
        Ok((0..of)
            .map(|index| Split::new(index, of, vec!["localhost".to_string()]))
            .collect())
    }

    fn partitions_in_split(
        &self,
        projection: &RichProjection,
        split: &Split,
    ) -> Result<Vec<BinaryRecord>> {
        let datasets = self.datasets.read().expect("store lock poisoned");
        let Some(dataset) = datasets.get(&projection.dataset().name) else {
            return Ok(Vec::new());
        };
        let mut keys: Vec<(Vec<u8>, BinaryRecord)> = Vec::new();
        for bytes in dataset.partitions.keys() {
            if split_bucket(bytes, split.of) != split.index {
                continue;
            }
            let record = BinaryRecord::from_bytes(
                projection.partition_schema(),
                Bytes::from(bytes.clone()),
            )?;
            keys.push((bytes.clone(), record));
        }
        // Deterministic enumeration order regardless of hash-map layout.
        keys.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(keys.into_iter().map(|(_, record)| record).collect())
    }

    fn chunk_metadata(
        &self,
        projection: &RichProjection,
        partition: &BinaryRecord,
        version: ShardVersion,
    ) -> Result<Vec<ChunkMetadata>> {
        let datasets = self.datasets.read().expect("store lock poisoned");
        let chunks = datasets
            .get(&projection.dataset().name)
            .and_then(|d| d.partitions.get(partition.as_bytes()))
            .and_then(|p| p.versions.get(&version));
        let Some(chunks) = chunks else {
            return Ok(Vec::new());
        };
        chunks
            .values()
            .map(|stored| Self::decode_descriptor(&stored.descriptor, projection.row_key_schema()))
            .collect()
    }

    fn read_chunk(
        &self,
        projection: &RichProjection,
        partition: &BinaryRecord,
        version: ShardVersion,
        chunk_id: ChunkId,
    ) -> Result<ChunkData> {
        let datasets = self.datasets.read().expect("store lock poisoned");
        let stored = datasets
            .get(&projection.dataset().name)
            .and_then(|d| d.partitions.get(partition.as_bytes()))
            .and_then(|p| p.versions.get(&version))
            .and_then(|chunks| chunks.get(&chunk_id))
            .ok_or(Error::NotFound)?;
        let blob: ChunkDescriptorBlob = bitcode::decode(&stored.descriptor)
            .map_err(|e| Error::Internal(format!("chunk descriptor blob corrupted: {e}")))?;
        Ok(ChunkData {
            chunk_id,
            num_rows: blob.num_rows,
            columns: stored.columns.clone(),
        })
    }

    async fn write_chunk(&self, request: WriteChunkRequest) -> Result<ChunkId> {
        let (first_row, last_row) = request.row_range;
        let num_rows = i32::try_from(last_row - first_row + 1)
            .map_err(|_| Error::invalid_argument("chunk row range exceeds i32 rows"))?;
        let row_id_schema = RecordSchema::new(vec![KeyType::Long]);
        let first_key = BinaryRecord::encode(&row_id_schema, &[first_row.into()])?;
        let last_key = BinaryRecord::encode(&row_id_schema, &[last_row.into()])?;

        let mut datasets = self.datasets.write().expect("store lock poisoned");
        let partition_chunks = datasets
            .entry(request.dataset.clone())
            .or_default()
            .partitions
            .entry(request.partition.as_bytes().to_vec())
            .or_default();
        let chunk_id = partition_chunks.next_chunk_id;
        partition_chunks.next_chunk_id += 1;

        let blob = ChunkDescriptorBlob {
            chunk_id,
            num_rows,
            first_key: first_key.as_bytes().to_vec(),
            last_key: last_key.as_bytes().to_vec(),
            skips: Vec::new(),
        };
        partition_chunks
            .versions
            .entry(request.version)
            .or_default()
            .insert(
                chunk_id,
                StoredChunk {
                    descriptor: bitcode::encode(&blob),
                    columns: request.columns,
                },
            );
        Ok(chunk_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tessera_catalog::{ColumnDef, Dataset};

    fn projection() -> RichProjection {
        let dataset = Arc::new(Dataset::new(
            "gdelt",
            vec!["monthYear"],
            vec!["id"],
            vec![
                ColumnDef::new("monthYear", KeyType::Utf8),
                ColumnDef::new("id", KeyType::Long),
                ColumnDef::new("sqlDate", KeyType::Timestamp),
            ],
        ));
        RichProjection::new(dataset).unwrap()
    }

    #[tokio::test]
    async fn write_then_read_round_trips_descriptors() {
        let store = MemColumnStore::new();
        let p = projection();
        let partition = p.partition_key(&["1979-1984".into()]).unwrap();

        let mut columns = FxHashMap::default();
        columns.insert("id".to_string(), Bytes::from_static(b"\x00\x01"));
        let chunk_id = store
            .write_chunk(WriteChunkRequest {
                dataset: "gdelt".into(),
                partition: partition.clone(),
                version: 0,
                row_range: (0, 5),
                columns,
            })
            .await
            .unwrap();
        assert_eq!(chunk_id, 0);

        let metadata = store.chunk_metadata(&p, &partition, 0).unwrap();
        assert_eq!(metadata.len(), 1);
        assert_eq!(metadata[0].info.num_rows, 6);
        assert!(metadata[0].info.first_key <= metadata[0].info.last_key);

        let data = store.read_chunk(&p, &partition, 0, chunk_id).unwrap();
        assert_eq!(data.num_rows, 6);
        assert!(data.columns.contains_key("id"));
    }

    #[tokio::test]
    async fn chunk_ids_are_monotonic_per_partition() {
        let store = MemColumnStore::new();
        let p = projection();
        let partition = p.partition_key(&["1979-1984".into()]).unwrap();
        for expected in 0..3u64 {
            let id = store
                .write_chunk(WriteChunkRequest {
                    dataset: "gdelt".into(),
                    partition: partition.clone(),
                    version: 0,
                    row_range: (0, 0),
                    columns: FxHashMap::default(),
                })
                .await
                .unwrap();
            assert_eq!(id, expected);
        }
    }

    #[test]
    fn every_partition_lands_in_exactly_one_split() {
        let store = MemColumnStore::new();
        let p = projection();
        for i in 0..16 {
            let partition = p.partition_key(&[format!("bucket-{i}").into()]).unwrap();
            store.append_chunk(
                "gdelt",
                &partition,
                0,
                ChunkSetInfo::new(
                    0,
                    1,
                    p.row_key(&[0i64.into()]).unwrap(),
                    p.row_key(&[0i64.into()]).unwrap(),
                ),
                Vec::new(),
                FxHashMap::default(),
            );
        }
        let splits = store.get_scan_splits("gdelt", 4).unwrap();
        assert_eq!(splits.len(), 4);
        let total: usize = splits
            .iter()
            .map(|s| store.partitions_in_split(&p, s).unwrap().len())
            .sum();
        assert_eq!(total, 16);
    }
}
