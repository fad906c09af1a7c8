use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use rustc_hash::FxHashMap;
use tessera_catalog::{MemMetaStore, MetadataStore, RichProjection};
use tessera_ingest::{IngestCommand, IngestProtocol, IngesterConfig, PartitionIngester};
use tessera_record::BinaryRecord;
use tessera_result::{Error, Result};
use tessera_storage::{
    ChunkData, ChunkMetadata, ColumnStore, FaultInjectingStore, MemColumnStore, Split,
    WriteChunkRequest,
};
use tessera_test_utils::fixtures::{gdelt_partition, seeded_meta_store};
use tessera_test_utils::init_tracing_for_tests;
use tessera_types::{ChunkId, RowId, ShardVersion};
use tokio::sync::mpsc;

fn chunk(version: ShardVersion, first: RowId, last: RowId, ack: RowId) -> IngestCommand {
    let mut columns = FxHashMap::default();
    columns.insert("id".to_string(), Bytes::from_static(b"\x00\x01\x02"));
    columns.insert("sqlDate".to_string(), Bytes::from_static(b"\x09\x08"));
    IngestCommand::ChunkedColumns {
        version,
        row_range: (first, last),
        ack_row: ack,
        columns,
    }
}

fn spawn_gdelt(
    meta: Arc<dyn MetadataStore>,
    store: Arc<dyn ColumnStore>,
    columns: Vec<&str>,
) -> (
    tessera_ingest::IngesterHandle,
    mpsc::Receiver<IngestProtocol>,
) {
    PartitionIngester::spawn(
        meta,
        store,
        "gdelt",
        gdelt_partition(),
        columns.into_iter().map(String::from).collect(),
        IngesterConfig::default(),
    )
}

#[tokio::test]
async fn missing_dataset_is_rejected_at_startup() {
    init_tracing_for_tests();
    let meta = Arc::new(MemMetaStore::new());
    let store = Arc::new(MemColumnStore::new());
    let (_handle, mut events) = PartitionIngester::spawn(
        meta,
        store,
        "none",
        gdelt_partition(),
        vec!["id".to_string()],
        IngesterConfig::default(),
    );

    assert_eq!(
        events.recv().await,
        Some(IngestProtocol::NoDatasetColumns {
            dataset: "none".to_string()
        })
    );
    // The controller terminates: no further events.
    assert_eq!(events.recv().await, None);
}

#[tokio::test]
async fn empty_column_request_is_rejected_at_startup() {
    let meta = Arc::new(seeded_meta_store());
    let store = Arc::new(MemColumnStore::new());
    let (_handle, mut events) = spawn_gdelt(meta, store, vec![]);

    assert_eq!(
        events.recv().await,
        Some(IngestProtocol::NoDatasetColumns {
            dataset: "gdelt".to_string()
        })
    );
}

#[tokio::test]
async fn unknown_partition_is_rejected_at_startup() {
    let meta = Arc::new(seeded_meta_store());
    let store = Arc::new(MemColumnStore::new());
    let other = tessera_test_utils::fixtures::gdelt_projection()
        .partition_key(&["2005-2010".into()])
        .unwrap();
    let (_handle, mut events) = PartitionIngester::spawn(
        meta,
        store,
        "gdelt",
        other,
        vec!["id".to_string()],
        IngesterConfig::default(),
    );

    assert_eq!(events.recv().await, Some(IngestProtocol::NotFound));
}

#[tokio::test]
async fn undefined_columns_are_reported_by_name() {
    let meta = Arc::new(seeded_meta_store());
    let store = Arc::new(MemColumnStore::new());
    let (_handle, mut events) = spawn_gdelt(meta, store, vec!["monthYear", "last"]);

    assert_eq!(
        events.recv().await,
        Some(IngestProtocol::UndefinedColumns {
            dataset: "gdelt".to_string(),
            missing: vec!["last".to_string()],
        })
    );
}

#[tokio::test]
async fn happy_path_acks_and_records_the_shard_range() {
    init_tracing_for_tests();
    let meta = Arc::new(seeded_meta_store());
    let store = Arc::new(MemColumnStore::new());
    let partition = gdelt_partition();
    let (handle, mut events) = spawn_gdelt(meta.clone(), store, vec!["id", "sqlDate"]);

    assert_eq!(
        events.recv().await,
        Some(IngestProtocol::GoodToGo {
            dataset: "gdelt".to_string(),
            partition: partition.clone(),
        })
    );

    handle.send(chunk(0, 0, 5, 5)).await.unwrap();
    assert_eq!(
        events.recv().await,
        Some(IngestProtocol::Ack {
            dataset: "gdelt".to_string(),
            partition: partition.clone(),
            row_id: 5,
        })
    );

    let record = meta.get_partition("gdelt", &partition).await.unwrap();
    assert_eq!(record.num_shard_entries(), 1);
    assert_eq!(record.shard_versions[&0].len(), 1);

    assert!(handle.stop().await.unwrap());
}

#[tokio::test]
async fn negative_version_is_a_sharding_error_and_the_ingester_stays_ready() {
    let meta = Arc::new(seeded_meta_store());
    let store = Arc::new(MemColumnStore::new());
    let partition = gdelt_partition();
    let (handle, mut events) = spawn_gdelt(meta.clone(), store, vec!["id", "sqlDate"]);
    assert!(matches!(
        events.recv().await,
        Some(IngestProtocol::GoodToGo { .. })
    ));

    handle.send(chunk(-1, 0, 5, 5)).await.unwrap();
    assert_eq!(
        events.recv().await,
        Some(IngestProtocol::ShardingError {
            dataset: "gdelt".to_string(),
            partition: partition.clone(),
            row_id: 5,
        })
    );
    let record = meta.get_partition("gdelt", &partition).await.unwrap();
    assert_eq!(record.num_shard_entries(), 0);

    // Still ready: a valid chunk goes through afterwards.
    handle.send(chunk(0, 0, 5, 5)).await.unwrap();
    assert!(matches!(
        events.recv().await,
        Some(IngestProtocol::Ack { row_id: 5, .. })
    ));
}

#[tokio::test]
async fn inverted_row_range_is_a_sharding_error() {
    let meta = Arc::new(seeded_meta_store());
    let store = Arc::new(MemColumnStore::new());
    let (handle, mut events) = spawn_gdelt(meta, store, vec!["id"]);
    assert!(matches!(
        events.recv().await,
        Some(IngestProtocol::GoodToGo { .. })
    ));

    handle.send(chunk(0, 9, 3, 9)).await.unwrap();
    assert!(matches!(
        events.recv().await,
        Some(IngestProtocol::ShardingError { row_id: 9, .. })
    ));
}

#[tokio::test]
async fn failed_write_leaves_shard_versions_untouched() {
    let meta = Arc::new(seeded_meta_store());
    let store = Arc::new(FaultInjectingStore::new(MemColumnStore::new()));
    store.fail_next_writes(1);
    let partition = gdelt_partition();
    let (handle, mut events) = spawn_gdelt(meta.clone(), store.clone(), vec!["id"]);
    assert!(matches!(
        events.recv().await,
        Some(IngestProtocol::GoodToGo { .. })
    ));

    handle.send(chunk(0, 0, 5, 5)).await.unwrap();
    assert!(matches!(
        events.recv().await,
        Some(IngestProtocol::ShardingError { row_id: 5, .. })
    ));
    let record = meta.get_partition("gdelt", &partition).await.unwrap();
    assert_eq!(record.num_shard_entries(), 0);

    // The upstream retries; this time the write lands.
    handle.send(chunk(0, 0, 5, 5)).await.unwrap();
    assert!(matches!(
        events.recv().await,
        Some(IngestProtocol::Ack { row_id: 5, .. })
    ));
    let record = meta.get_partition("gdelt", &partition).await.unwrap();
    assert_eq!(record.num_shard_entries(), 1);
    assert_eq!(store.writes_attempted(), 2);
}

#[tokio::test]
async fn acks_come_out_in_acceptance_order() {
    let meta = Arc::new(seeded_meta_store());
    let store = Arc::new(MemColumnStore::new());
    let (handle, mut events) = spawn_gdelt(meta, store, vec!["id"]);
    assert!(matches!(
        events.recv().await,
        Some(IngestProtocol::GoodToGo { .. })
    ));

    for (first, last, ack) in [(0, 5, 5), (6, 9, 9), (10, 20, 20)] {
        handle.send(chunk(0, first, last, ack)).await.unwrap();
    }
    for expected in [5, 9, 20] {
        match events.recv().await {
            Some(IngestProtocol::Ack { row_id, .. }) => assert_eq!(row_id, expected),
            other => panic!("expected Ack({expected}), got {other:?}"),
        }
    }
}

#[tokio::test]
async fn stop_drains_chunks_queued_ahead_of_it() {
    let meta = Arc::new(seeded_meta_store());
    let store = Arc::new(MemColumnStore::new());
    let (handle, mut events) = spawn_gdelt(meta, store, vec!["id"]);

    handle.send(chunk(0, 0, 5, 5)).await.unwrap();
    handle.send(chunk(0, 6, 9, 9)).await.unwrap();
    // Stop queues behind the two chunks, so both are still acknowledged.
    assert!(handle.stop().await.unwrap());

    assert!(matches!(
        events.recv().await,
        Some(IngestProtocol::GoodToGo { .. })
    ));
    for expected in [5, 9] {
        assert!(matches!(
            events.recv().await,
            Some(IngestProtocol::Ack { row_id, .. }) if row_id == expected
        ));
    }
    assert_eq!(events.recv().await, None);
}

/// Writer that never completes; used to exercise the hard-stop bound.
struct HangingStore;

#[async_trait::async_trait]
impl ColumnStore for HangingStore {
    fn get_scan_splits(&self, _dataset: &str, _splits_per_node: usize) -> Result<Vec<Split>> {
        Ok(Vec::new())
    }

    fn partitions_in_split(
        &self,
        _projection: &RichProjection,
        _split: &Split,
    ) -> Result<Vec<BinaryRecord>> {
        Ok(Vec::new())
    }

    fn chunk_metadata(
        &self,
        _projection: &RichProjection,
        _partition: &BinaryRecord,
        _version: ShardVersion,
    ) -> Result<Vec<ChunkMetadata>> {
        Ok(Vec::new())
    }

    fn read_chunk(
        &self,
        _projection: &RichProjection,
        _partition: &BinaryRecord,
        _version: ShardVersion,
        _chunk_id: ChunkId,
    ) -> Result<ChunkData> {
        Err(Error::NotFound)
    }

    async fn write_chunk(&self, _request: WriteChunkRequest) -> Result<ChunkId> {
        std::future::pending::<()>().await;
        unreachable!()
    }
}

#[tokio::test]
async fn stuck_writes_are_terminated_after_the_stop_window() {
    let meta = Arc::new(seeded_meta_store());
    let store = Arc::new(HangingStore);
    let config = IngesterConfig {
        stop_timeout: Duration::from_millis(50),
        ..IngesterConfig::default()
    };
    let (handle, mut events) = PartitionIngester::spawn(
        meta,
        store,
        "gdelt",
        gdelt_partition(),
        vec!["id".to_string()],
        config,
    );
    assert!(matches!(
        events.recv().await,
        Some(IngestProtocol::GoodToGo { .. })
    ));

    handle.send(chunk(0, 0, 5, 5)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    // The write never finishes: stop times out and the task is aborted.
    let graceful = handle.stop().await.unwrap();
    assert!(!graceful);
    // No acknowledgement for the pending chunk.
    assert_eq!(events.recv().await, None);
}
