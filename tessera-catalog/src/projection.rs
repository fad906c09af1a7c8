use std::sync::Arc;

use tessera_record::{BinaryRecord, RecordSchema};
use tessera_result::{Error, Result};
use tessera_types::KeyValue;

use crate::dataset::{ColumnDef, Dataset};

/// Resolved schema view used by a query: ordered partition-key columns,
/// ordered row-key columns, and the remaining data columns.
///
/// Construction validates that every declared key column exists; the
/// projection is immutable afterwards.
#[derive(Debug, Clone)]
pub struct RichProjection {
    dataset: Arc<Dataset>,
    partition_columns: Vec<ColumnDef>,
    row_key_columns: Vec<ColumnDef>,
    data_columns: Vec<ColumnDef>,
    partition_schema: Arc<RecordSchema>,
    row_key_schema: Arc<RecordSchema>,
}

impl RichProjection {
    pub fn new(dataset: Arc<Dataset>) -> Result<Self> {
        let resolve = |names: &[String]| -> Result<Vec<ColumnDef>> {
            names
                .iter()
                .map(|n| {
                    dataset.column(n).cloned().ok_or_else(|| {
                        Error::Catalog(format!(
                            "dataset {} declares key column {n} but does not define it",
                            dataset.name
                        ))
                    })
                })
                .collect()
        };
        let partition_columns = resolve(&dataset.partition_columns)?;
        let row_key_columns = resolve(&dataset.row_key_columns)?;
        if partition_columns.is_empty() {
            return Err(Error::Catalog(format!(
                "dataset {} declares no partition columns",
                dataset.name
            )));
        }

        let is_key = |c: &ColumnDef| {
            dataset.partition_columns.iter().any(|n| *n == c.name)
                || dataset.row_key_columns.iter().any(|n| *n == c.name)
        };
        let data_columns = dataset
            .columns
            .iter()
            .filter(|c| !is_key(c))
            .cloned()
            .collect();

        let partition_schema =
            RecordSchema::new(partition_columns.iter().map(|c| c.col_type.clone()).collect());
        let row_key_schema =
            RecordSchema::new(row_key_columns.iter().map(|c| c.col_type.clone()).collect());

        Ok(Self {
            dataset,
            partition_columns,
            row_key_columns,
            data_columns,
            partition_schema,
            row_key_schema,
        })
    }

    #[inline]
    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    #[inline]
    pub fn partition_columns(&self) -> &[ColumnDef] {
        &self.partition_columns
    }

    #[inline]
    pub fn row_key_columns(&self) -> &[ColumnDef] {
        &self.row_key_columns
    }

    #[inline]
    pub fn data_columns(&self) -> &[ColumnDef] {
        &self.data_columns
    }

    #[inline]
    pub fn partition_schema(&self) -> &Arc<RecordSchema> {
        &self.partition_schema
    }

    #[inline]
    pub fn row_key_schema(&self) -> &Arc<RecordSchema> {
        &self.row_key_schema
    }

    /// Position of `column` in the partition key, if it is part of it.
    pub fn partition_position(&self, column: &str) -> Option<usize> {
        self.partition_columns.iter().position(|c| c.name == column)
    }

    /// Position of `column` in the row key, if it is part of it.
    pub fn row_key_position(&self, column: &str) -> Option<usize> {
        self.row_key_columns.iter().position(|c| c.name == column)
    }

    /// Encode a full partition key in declared column order.
    pub fn partition_key(&self, values: &[KeyValue]) -> Result<BinaryRecord> {
        BinaryRecord::encode(&self.partition_schema, values)
    }

    /// Encode a full row key in declared column order.
    pub fn row_key(&self, values: &[KeyValue]) -> Result<BinaryRecord> {
        BinaryRecord::encode(&self.row_key_schema, values)
    }

    /// Encode a row-key *prefix* (a range-scan bound).
    pub fn row_key_prefix(&self, values: &[KeyValue]) -> Result<BinaryRecord> {
        if values.len() > self.row_key_schema.len() {
            return Err(Error::encoding(format!(
                "row key prefix of {} fields exceeds declared row key of {}",
                values.len(),
                self.row_key_schema.len()
            )));
        }
        BinaryRecord::encode(&self.row_key_schema.prefix(values.len()), values)
    }
}
