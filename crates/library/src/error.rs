//! Library Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Only the fallible steps of shelving
//! a single item and the service's startup surface these; the per-item
//! handler itself reports every ending as an [`Outcome`](crate::Outcome).

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// ### Operational Errors
/// - [`ErrorKind::Conflict`]
/// - [`ErrorKind::Occupied`]
/// - [`ErrorKind::InvalidDestination`]
///
/// ### Dependency Errors
/// - [`ErrorKind::Storage`]
/// - [`ErrorKind::Watch`]
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// A storage backend operation (stat, list, rename, delete) failed.
    Storage,
    /// Every `_n` suffix up to the probe limit is taken.
    #[display("no free destination name for {}", _0.display())]
    Conflict(#[error(not(source))] PathBuf),
    /// The unsorted fallback target already exists; it is never overwritten.
    #[display("fallback target already exists: {}", _0.display())]
    Occupied(#[error(not(source))] PathBuf),
    /// A destination built from metadata would leave the library root, or
    /// the source has no file name.
    #[display("invalid destination for {}", _0.display())]
    InvalidDestination(#[error(not(source))] PathBuf),
    /// The filesystem watcher could not be created, registered, or stopped
    /// delivering events.
    Watch,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage | Self::Conflict(_))
    }
}
