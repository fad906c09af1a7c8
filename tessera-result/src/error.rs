use std::io;
use thiserror::Error;

/// Unified error type for all Tessera operations.
///
/// Errors propagate upward through the call stack using Rust's `?` operator.
/// At API boundaries they are typically converted to user-facing messages;
/// internal code matches on specific variants for fine-grained handling.
///
/// `Error` is `Send + Sync` so it can cross task boundaries on the ingest
/// path.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error from the column store backend.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid user input or API parameter.
    ///
    /// Covers malformed scan requests, out-of-range values, and arguments
    /// that contradict the dataset definition. Recoverable: fix the input
    /// and retry.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Dataset, partition, or chunk not found.
    #[error("Entity not found")]
    NotFound,

    /// A filter value could not be parsed as the declared key type.
    ///
    /// Raised by the predicate compiler when pushing a filter down to a key
    /// column whose [`KeyType`] rejects the literal. Fatal to the query.
    ///
    /// [`KeyType`]: https://docs.rs/tessera-types
    #[error("Cannot parse value {value} as key type {expected}")]
    KeyParse {
        expected: &'static str,
        value: String,
    },

    /// A key tuple could not be encoded against the projection layout.
    ///
    /// Arity mismatches and runtime-type mismatches between supplied values
    /// and the declared partition-key or row-key columns end up here.
    #[error("Record encoding error: {0}")]
    Encoding(String),

    /// A filter on a partition column that the compiler cannot push down.
    ///
    /// Only equality and set membership are supported on partition columns;
    /// anything else is uninterpretable for partition enumeration and fatal
    /// to the query.
    #[error("Unsupported filter on partition column: {0}")]
    UnsupportedFilter(String),

    /// Catalog metadata inconsistent with itself or with stored data.
    #[error("{0}")]
    Catalog(String),

    /// Internal invariant violation. Indicates a bug.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Shorthand for [`Error::InvalidArgument`] from any displayable message.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Shorthand for [`Error::Encoding`].
    pub fn encoding(msg: impl Into<String>) -> Self {
        Error::Encoding(msg.into())
    }
}
