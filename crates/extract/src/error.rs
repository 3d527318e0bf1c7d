//! Extraction Error Types
//!
//! These never escape [`extract()`](crate::extract); they exist so container
//! readers can use `?` and so the logged failure carries an `exn` frame tree.

use derive_more::{Display, Error};

use crate::models::Format;

/// An extraction error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The container could not be opened or parsed at all.
    #[display("unreadable {_0} container")]
    Unreadable(#[error(not(source))] Format),
    /// The container parsed but lacks the metadata structure being looked for.
    #[display("missing metadata: {_0}")]
    MissingField(#[error(not(source))] &'static str),
    /// A metadata field was present but could not be decoded to text.
    #[display("failed to decode field '{_0}'")]
    Undecodable(#[error(not(source))] &'static str),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // A file that was still being written could parse later, but by the
        // time extraction runs the stabilization delay has already passed.
        false
    }
}
