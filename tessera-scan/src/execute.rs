use std::sync::Arc;

use rustc_hash::FxHashMap;
use tessera_catalog::RichProjection;
use tessera_chunk_index::{
    ChunkIdChunkIndex, ChunkSetInfo, PartitionChunkIndex, RowKeyChunkIndex,
};
use tessera_plan::ChunkScanMethod;
use tessera_record::BinaryRecord;
use tessera_result::Result;
use tessera_storage::{ChunkData, ColumnStore};
use tessera_types::{ChunkId, ShardVersion};
use tracing::debug;

use crate::reader::{RowReaderFactory, ScanRow};
use crate::PartitionScanMethod;

/// Start a scan and return its lazy row iterator.
///
/// `columns` restricts which raw buffers reach the reader; an empty list
/// means every stored column. Dropping the returned iterator cancels the
/// scan; nothing is prefetched beyond the chunk currently being read.
pub fn scan_rows<'a, F: RowReaderFactory>(
    store: &'a dyn ColumnStore,
    projection: &'a RichProjection,
    columns: &[String],
    version: ShardVersion,
    partition_scan: PartitionScanMethod,
    chunk_scan: ChunkScanMethod,
    factory: &'a F,
) -> Result<RowScan<'a, F>> {
    let partitions = match partition_scan {
        PartitionScanMethod::Single(key) => vec![key],
        PartitionScanMethod::Multi(keys) => keys,
        PartitionScanMethod::Filtered(split, predicate) => {
            let candidates = store.partitions_in_split(projection, &split)?;
            let survivors: Vec<BinaryRecord> = candidates
                .into_iter()
                .filter(|key| predicate.matches(key))
                .collect();
            debug!(
                split = split.index,
                survivors = survivors.len(),
                "residual predicate applied to split candidates"
            );
            survivors
        }
    };
    Ok(RowScan {
        store,
        projection,
        columns: columns.to_vec(),
        version,
        chunk_scan,
        factory,
        partitions: partitions.into_iter(),
        current: None,
        failed: false,
    })
}

/// Lazy row stream over the selected partitions and chunks.
///
/// Fuses after the first error: backend or decode failures surface once
/// as `Err` and end the stream.
pub struct RowScan<'a, F: RowReaderFactory> {
    store: &'a dyn ColumnStore,
    projection: &'a RichProjection,
    columns: Vec<String>,
    version: ShardVersion,
    chunk_scan: ChunkScanMethod,
    factory: &'a F,
    partitions: std::vec::IntoIter<BinaryRecord>,
    current: Option<PartitionCursor<F::Row>>,
    failed: bool,
}

struct PartitionCursor<R> {
    partition: BinaryRecord,
    chunks: std::vec::IntoIter<(ChunkSetInfo, Arc<[u32]>)>,
    rows: Option<ChunkRows<R>>,
}

struct ChunkRows<R> {
    chunk_id: ChunkId,
    skips: Arc<[u32]>,
    skip_pos: usize,
    offset: u32,
    iter: Box<dyn Iterator<Item = Result<R>> + Send>,
}

impl<'a, F: RowReaderFactory> RowScan<'a, F> {
    /// Rebuild the partition's chunk index from backend metadata and
    /// select the chunks this scan touches. The index variant follows the
    /// access pattern: range scans want row-key order, full scans want
    /// ingest order.
    fn select_chunks(
        &self,
        partition: &BinaryRecord,
    ) -> Result<Vec<(ChunkSetInfo, Arc<[u32]>)>> {
        let metadata = self
            .store
            .chunk_metadata(self.projection, partition, self.version)?;
        match &self.chunk_scan {
            ChunkScanMethod::All => {
                let mut index = ChunkIdChunkIndex::new();
                for m in metadata {
                    index.add(m.info, &m.skips);
                }
                Ok(index
                    .all_chunks()
                    .map(|(info, skips)| (info.clone(), skips))
                    .collect())
            }
            ChunkScanMethod::RowKeyRange(lo, hi) => {
                let mut index = RowKeyChunkIndex::new();
                for m in metadata {
                    index.add(m.info, &m.skips);
                }
                Ok(index
                    .row_key_range(lo, hi)
                    .map(|(info, skips)| (info.clone(), skips))
                    .collect())
            }
        }
    }

    fn open_chunk(
        &self,
        partition: &BinaryRecord,
        info: &ChunkSetInfo,
        skips: Arc<[u32]>,
    ) -> Result<ChunkRows<F::Row>> {
        let mut data = self
            .store
            .read_chunk(self.projection, partition, self.version, info.chunk_id)?;
        if !self.columns.is_empty() {
            let mut restricted = FxHashMap::default();
            for name in &self.columns {
                if let Some(buffer) = data.columns.remove(name) {
                    restricted.insert(name.clone(), buffer);
                }
            }
            data = ChunkData {
                columns: restricted,
                ..data
            };
        }
        let iter = self.factory.open(self.projection, &data)?;
        Ok(ChunkRows {
            chunk_id: info.chunk_id,
            skips,
            skip_pos: 0,
            offset: 0,
            iter,
        })
    }
}

impl<'a, F: RowReaderFactory> Iterator for RowScan<'a, F> {
    type Item = Result<ScanRow<F::Row>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            if let Some(cursor) = self.current.as_mut() {
                if let Some(rows) = cursor.rows.as_mut() {
                    for item in rows.iter.by_ref() {
                        let offset = rows.offset;
                        rows.offset += 1;
                        while rows.skip_pos < rows.skips.len()
                            && rows.skips[rows.skip_pos] < offset
                        {
                            rows.skip_pos += 1;
                        }
                        let superseded = rows.skips.get(rows.skip_pos) == Some(&offset);
                        match item {
                            Err(e) => {
                                self.failed = true;
                                return Some(Err(e));
                            }
                            Ok(_) if superseded => continue,
                            Ok(row) => {
                                return Some(Ok(ScanRow {
                                    partition: cursor.partition.clone(),
                                    chunk_id: rows.chunk_id,
                                    offset,
                                    row,
                                }));
                            }
                        }
                    }
                    cursor.rows = None;
                }
                if let Some((info, skips)) = cursor.chunks.next() {
                    let partition = cursor.partition.clone();
                    match self.open_chunk(&partition, &info, skips) {
                        Ok(rows) => {
                            // Borrow of self.current ended above; reacquire.
                            if let Some(cursor) = self.current.as_mut() {
                                cursor.rows = Some(rows);
                            }
                            continue;
                        }
                        Err(e) => {
                            self.failed = true;
                            return Some(Err(e));
                        }
                    }
                }
                self.current = None;
            }
            let partition = self.partitions.next()?;
            match self.select_chunks(&partition) {
                Ok(chunks) => {
                    self.current = Some(PartitionCursor {
                        partition,
                        chunks: chunks.into_iter(),
                        rows: None,
                    });
                }
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
