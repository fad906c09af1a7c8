use std::sync::Arc;

use tessera_types::KeyType;

/// Ordered list of key-field types, one per key column.
///
/// Shared via `Arc` between every [`BinaryRecord`](crate::BinaryRecord)
/// encoded against it; cloning a record never copies the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    fields: Vec<KeyType>,
}

impl RecordSchema {
    pub fn new(fields: Vec<KeyType>) -> Arc<Self> {
        Arc::new(Self { fields })
    }

    #[inline]
    pub fn fields(&self) -> &[KeyType] {
        &self.fields
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Schema over the first `n` fields. Used to encode range-scan bounds
    /// from a key-column prefix.
    pub fn prefix(&self, n: usize) -> Arc<Self> {
        RecordSchema::new(self.fields[..n].to_vec())
    }
}
