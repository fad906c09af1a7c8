//! Order-preserving binary encoding of typed key tuples.
//!
//! A [`BinaryRecord`] is a compact, immutable byte buffer encoding an
//! ordered tuple of typed key fields against a [`RecordSchema`]. Records
//! compare field by field in declared order; for fixed-width numeric fields
//! the encoding itself is order-preserving (big-endian, sign bit flipped),
//! strings are length-prefixed and compare on their contents.
//!
//! Records built from a *prefix* of a schema (range-scan bounds) compare
//! against full records over the common field prefix. The ordered chunk
//! containers key on `(first_key, chunk_id)` with the chunk id as a unique
//! tiebreaker, so prefix-equal bounds select every chunk sharing the
//! prefix.

pub mod codec;
pub mod record;
pub mod schema;

pub use record::BinaryRecord;
pub use schema::RecordSchema;
