use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tessera_catalog::RichProjection;
use tessera_record::BinaryRecord;
use tessera_result::{Error, Result};
use tessera_types::{ChunkId, ShardVersion};

use crate::chunk::{ChunkData, ChunkMetadata, WriteChunkRequest};
use crate::split::Split;
use crate::store::ColumnStore;

/// Wrapper that fails a configured number of upcoming writes.
///
/// Reads pass through untouched. Used to exercise ingest error paths:
/// a failed write must surface a sharding error and leave partition
/// bookkeeping unchanged.
pub struct FaultInjectingStore<S> {
    inner: S,
    fail_writes: AtomicUsize,
    writes_attempted: AtomicUsize,
}

impl<S> FaultInjectingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            fail_writes: AtomicUsize::new(0),
            writes_attempted: AtomicUsize::new(0),
        }
    }

    /// Make the next `n` writes fail with an injected I/O error.
    pub fn fail_next_writes(&self, n: usize) {
        self.fail_writes.store(n, Ordering::SeqCst);
    }

    /// Writes attempted so far, failed ones included.
    pub fn writes_attempted(&self) -> usize {
        self.writes_attempted.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn take_failure(&self) -> bool {
        self.fail_writes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl<S: ColumnStore> ColumnStore for FaultInjectingStore<S> {
    fn get_scan_splits(&self, dataset: &str, splits_per_node: usize) -> Result<Vec<Split>> {
        self.inner.get_scan_splits(dataset, splits_per_node)
    }

    fn partitions_in_split(
        &self,
        projection: &RichProjection,
        split: &Split,
    ) -> Result<Vec<BinaryRecord>> {
        self.inner.partitions_in_split(projection, split)
    }

    fn chunk_metadata(
        &self,
        projection: &RichProjection,
        partition: &BinaryRecord,
        version: ShardVersion,
    ) -> Result<Vec<ChunkMetadata>> {
        self.inner.chunk_metadata(projection, partition, version)
    }

    fn read_chunk(
        &self,
        projection: &RichProjection,
        partition: &BinaryRecord,
        version: ShardVersion,
        chunk_id: ChunkId,
    ) -> Result<ChunkData> {
        self.inner.read_chunk(projection, partition, version, chunk_id)
    }

    async fn write_chunk(&self, request: WriteChunkRequest) -> Result<ChunkId> {
        self.writes_attempted.fetch_add(1, Ordering::SeqCst);
        if self.take_failure() {
            return Err(Error::Io(std::io::Error::other("injected write failure")));
        }
        self.inner.write_chunk(request).await
    }
}
