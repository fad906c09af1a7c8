use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use rustc_hash::FxHashMap;
use tessera_catalog::{MetadataStore, ShardRange};
use tessera_record::BinaryRecord;
use tessera_result::{Error, Result};
use tessera_storage::{ColumnStore, WriteChunkRequest};
use tessera_types::{RowId, ShardVersion};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::protocol::{IngestCommand, IngestProtocol};

/// Tunables of one ingester instance.
#[derive(Debug, Clone)]
pub struct IngesterConfig {
    /// Command mailbox depth before senders back-pressure.
    pub mailbox_capacity: usize,
    /// Graceful-stop window before the task is aborted.
    pub stop_timeout: Duration,
}

impl Default for IngesterConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: 64,
            stop_timeout: Duration::from_secs(3),
        }
    }
}

/// Client side of a spawned ingester.
pub struct IngesterHandle {
    commands: mpsc::Sender<IngestCommand>,
    join: JoinHandle<()>,
    stop_timeout: Duration,
}

impl IngesterHandle {
    /// Submit one command; errors once the ingester has terminated.
    pub async fn send(&self, command: IngestCommand) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| Error::invalid_argument("ingester has terminated"))
    }

    /// Stop the ingester by queueing [`IngestCommand::Stop`]: chunks
    /// already in the mailbox drain first, bounded by the configured
    /// window, past which the task is aborted. Returns whether the stop
    /// was graceful.
    pub async fn stop(self) -> Result<bool> {
        let abort = self.join.abort_handle();
        let drain = async {
            // An already-terminated actor has dropped its receiver; that
            // is a graceful stop too.
            let _ = self.commands.send(IngestCommand::Stop).await;
            self.join.await
        };
        match tokio::time::timeout(self.stop_timeout, drain).await {
            Ok(joined) => {
                joined.map_err(|e| Error::Internal(format!("ingester task panicked: {e}")))?;
                Ok(true)
            }
            Err(_elapsed) => {
                warn!("ingester exceeded its stop window; terminating");
                abort.abort();
                Ok(false)
            }
        }
    }
}

/// Per-`(dataset, partition, columns)` ingest controller.
///
/// Single-threaded with respect to its mailbox: shard bookkeeping updates
/// are linearized, and acks come out in acceptance order.
pub struct PartitionIngester {
    meta: Arc<dyn MetadataStore>,
    store: Arc<dyn ColumnStore>,
    dataset: String,
    partition: BinaryRecord,
    columns: Vec<String>,
    events: mpsc::Sender<IngestProtocol>,
}

impl PartitionIngester {
    /// Spawn a controller. The first event on the returned channel is the
    /// startup outcome; on anything but
    /// [`IngestProtocol::GoodToGo`] the task terminates immediately.
    pub fn spawn(
        meta: Arc<dyn MetadataStore>,
        store: Arc<dyn ColumnStore>,
        dataset: impl Into<String>,
        partition: BinaryRecord,
        columns: Vec<String>,
        config: IngesterConfig,
    ) -> (IngesterHandle, mpsc::Receiver<IngestProtocol>) {
        let (command_tx, command_rx) = mpsc::channel(config.mailbox_capacity);
        let (event_tx, event_rx) = mpsc::channel(config.mailbox_capacity);

        let ingester = PartitionIngester {
            meta,
            store,
            dataset: dataset.into(),
            partition,
            columns,
            events: event_tx,
        };
        let join = tokio::spawn(ingester.run(command_rx));

        (
            IngesterHandle {
                commands: command_tx,
                join,
                stop_timeout: config.stop_timeout,
            },
            event_rx,
        )
    }

    async fn run(self, mut commands: mpsc::Receiver<IngestCommand>) {
        match self.validate().await {
            Ok(()) => {
                let ready = IngestProtocol::GoodToGo {
                    dataset: self.dataset.clone(),
                    partition: self.partition.clone(),
                };
                if self.events.send(ready).await.is_err() {
                    return;
                }
            }
            Err(rejection) => {
                let _ = self.events.send(rejection).await;
                return;
            }
        }

        loop {
            match commands.recv().await {
                Some(IngestCommand::ChunkedColumns {
                    version,
                    row_range,
                    ack_row,
                    columns,
                }) => {
                    let response = self
                        .handle_chunk(version, row_range, ack_row, columns)
                        .await;
                    if self.events.send(response).await.is_err() {
                        return;
                    }
                }
                Some(IngestCommand::Stop) => {
                    debug!(dataset = %self.dataset, "ingester stopped");
                    return;
                }
                // All senders gone: nothing more can arrive.
                None => return,
            }
        }
    }

    /// Startup validation, in order: dataset schema, partition record,
    /// requested column names.
    async fn validate(&self) -> std::result::Result<(), IngestProtocol> {
        let schema = match self.meta.get_schema(&self.dataset, 0).await {
            Ok(schema) if !schema.is_empty() && !self.columns.is_empty() => schema,
            _ => {
                return Err(IngestProtocol::NoDatasetColumns {
                    dataset: self.dataset.clone(),
                });
            }
        };

        if self
            .meta
            .get_partition(&self.dataset, &self.partition)
            .await
            .is_err()
        {
            return Err(IngestProtocol::NotFound);
        }

        let missing: Vec<String> = self
            .columns
            .iter()
            .filter(|name| !schema.contains_key(*name))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(IngestProtocol::UndefinedColumns {
                dataset: self.dataset.clone(),
                missing,
            });
        }
        Ok(())
    }

    async fn handle_chunk(
        &self,
        version: ShardVersion,
        row_range: (RowId, RowId),
        ack_row: RowId,
        columns: FxHashMap<String, Bytes>,
    ) -> IngestProtocol {
        if version < 0 || row_range.0 > row_range.1 {
            warn!(
                dataset = %self.dataset,
                version,
                "rejecting chunk with invalid version or row range"
            );
            return self.sharding_error(ack_row);
        }

        let request = WriteChunkRequest {
            dataset: self.dataset.clone(),
            partition: self.partition.clone(),
            version,
            row_range,
            columns,
        };
        if let Err(error) = self.store.write_chunk(request).await {
            warn!(dataset = %self.dataset, %error, "chunk write failed");
            return self.sharding_error(ack_row);
        }

        // Shard bookkeeping only moves after the write is durable; a
        // failed write leaves the previous snapshot observable.
        let range = ShardRange {
            first_row: row_range.0,
            last_row: row_range.1,
        };
        match self
            .meta
            .update_partition_shards(&self.dataset, &self.partition, version, range)
            .await
        {
            Ok(()) => IngestProtocol::Ack {
                dataset: self.dataset.clone(),
                partition: self.partition.clone(),
                row_id: ack_row,
            },
            Err(error) => {
                warn!(dataset = %self.dataset, %error, "shard bookkeeping update failed");
                self.sharding_error(ack_row)
            }
        }
    }

    fn sharding_error(&self, row_id: RowId) -> IngestProtocol {
        IngestProtocol::ShardingError {
            dataset: self.dataset.clone(),
            partition: self.partition.clone(),
            row_id,
        }
    }
}
