//! Classification Error Types
//!
//! None of these reach the arrival tracker: [`Classify::classify`](crate::Classify::classify)
//! logs the error tree and answers [`Category::Unsorted`](crate::Category::Unsorted).

use derive_more::{Display, Error};

/// A classification error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for classification operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// No API key was configured; every item is unsorted until one is.
    #[display("no API key configured")]
    MissingCredential,
    /// The HTTP client could not be constructed.
    #[display("could not build HTTP client")]
    Client,
    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[display("request to classification API failed")]
    Request,
    /// The API answered with a non-success status.
    #[display("classification API returned HTTP {_0}")]
    Status(#[error(not(source))] u16),
    /// The response body was not the expected JSON shape.
    #[display("undecodable response from classification API")]
    Response,
    /// The model answered with something outside the category list.
    #[display("unexpected answer: {_0:?}")]
    UnexpectedAnswer(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request => true,
            Self::Status(status) => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorKind::Request, true)]
    #[case(ErrorKind::Status(429), true)]
    #[case(ErrorKind::Status(529), true)]
    #[case(ErrorKind::Status(401), false)]
    #[case(ErrorKind::MissingCredential, false)]
    #[case(ErrorKind::UnexpectedAnswer("poetry".to_string()), false)]
    fn test_retryable(#[case] kind: ErrorKind, #[case] expected: bool) {
        assert_eq!(kind.is_retryable(), expected);
    }
}
