//! Error types and result definitions for the Tessera columnar store.
//!
//! Tessera uses a single error enum ([`Error`]) across all of its crates. All
//! fallible operations return [`Result<T>`], propagating failures with the `?`
//! operator; callers that need programmatic handling match on the variant.
//!
//! The taxonomy follows the planner/ingest split of the system:
//!
//! - **Key handling** ([`Error::KeyParse`], [`Error::Encoding`]): a filter
//!   value or key tuple does not fit the declared key-column layout. Fatal to
//!   the query that supplied it.
//! - **Planning** ([`Error::UnsupportedFilter`]): a filter shape the compiler
//!   is asked to push down but cannot interpret. Fatal to the query; plan
//!   *degradations* (gapped prefixes, oversized partition products) are never
//!   errors and only log.
//! - **Lookups** ([`Error::NotFound`]): missing datasets, partitions, chunks.
//! - **Catalog** ([`Error::Catalog`]): metadata inconsistent with itself.
//! - **I/O and internal** ([`Error::Io`], [`Error::Internal`]): backend
//!   failures and broken invariants.

pub mod error;
pub mod result;

pub use error::Error;
pub use result::Result;
