//! Error types. Missing keys are reported through `Option`, never here.

use thiserror::Error;

/// Failures while constructing or growing a table.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum TableError {
    #[error("out of memory allocating a bucket array of {buckets} buckets")]
    OutOfMemory { buckets: usize },
    #[error("bucket capacity overflowed usize while growing")]
    CapacityOverflow,
    #[error("max load percent must be greater than zero")]
    InvalidLoadFactor,
}

/// Failures of a detached [`Cursor`](crate::Cursor).
#[derive(Error, Debug, Clone, Copy, Eq, PartialEq)]
pub enum IterError {
    #[error("cursor invalidated by a structural change to the table")]
    Invalidated,
    #[error("cursor used with a table other than the one it was created from")]
    ForeignTable,
}
