//! The `gdelt` fixture dataset used across integration tests.

use std::sync::Arc;

use tessera_catalog::{ColumnDef, Dataset, MemMetaStore, RichProjection};
use tessera_record::BinaryRecord;
use tessera_types::KeyType;

/// Dataset partitioned by a year-bucket string, row-keyed by event id.
pub fn gdelt_dataset() -> Dataset {
    Dataset::new(
        "gdelt",
        vec!["monthYear"],
        vec!["id"],
        vec![
            ColumnDef::new("monthYear", KeyType::Utf8),
            ColumnDef::new("year", KeyType::Int),
            ColumnDef::new("actor2Code", KeyType::Utf8),
            ColumnDef::new("id", KeyType::Long),
            ColumnDef::new("sqlDate", KeyType::Timestamp),
        ],
    )
}

pub fn gdelt_projection() -> RichProjection {
    RichProjection::new(Arc::new(gdelt_dataset())).expect("gdelt fixture is well-formed")
}

/// The fixture partition `"1979-1984"`.
pub fn gdelt_partition() -> BinaryRecord {
    gdelt_projection()
        .partition_key(&["1979-1984".into()])
        .expect("fixture partition encodes")
}

/// Metadata store pre-seeded with the `gdelt` dataset and its fixture
/// partition.
pub fn seeded_meta_store() -> MemMetaStore {
    let store = MemMetaStore::new();
    store.register_dataset(gdelt_dataset());
    store.create_partition("gdelt", gdelt_partition());
    store
}
