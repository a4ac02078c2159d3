//! Solver error types

use thiserror::Error;

/// Solver result type alias
pub type SolveResult<T> = Result<T, SolveError>;

/// Reasons a challenge string (or a token checked against one) is rejected
/// before any search is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Fewer than four colon-separated fields
    #[error("expected at least 4 colon-separated fields, found {0}")]
    TooFewFields(usize),

    /// Version field is not the integer 1
    #[error("unsupported challenge version: {0:?}")]
    UnsupportedVersion(String),

    /// Easiness is not an integer in 0..=255
    #[error("easiness out of range (0-255): {0:?}")]
    EasinessOutOfRange(String),

    /// Token field is empty
    #[error("token field is empty")]
    EmptyToken,

    /// Token field is not valid base64url
    #[error("token is not valid base64url: {0}")]
    InvalidToken(#[from] base64::DecodeError),

    /// Decoded token is not exactly 48 bytes
    #[error("decoded token is {0} bytes, expected 48")]
    TokenLength(usize),

    /// Solved token does not have the `1:<token>:<counter>` shape
    #[error("malformed solution token: {0}")]
    MalformedSolution(String),
}

/// Errors surfaced by [`crate::Solver`] and the search executors
#[derive(Debug, Error)]
pub enum SolveError {
    /// Challenge string is malformed; no search was attempted
    #[error("malformed challenge: {0}")]
    Format(#[from] FormatError),

    /// Every counter in the search space was tried without a hit
    #[error("counter space exhausted without finding a solution")]
    Exhausted,

    /// Search ended (cancelled) before any solution was claimed
    #[error("search stopped before a solution was found")]
    NotFound,

    /// Worker pool or background task failure
    #[error("internal error: {0}")]
    Internal(String),
}

impl SolveError {
    /// True for the errors that mean "no token for this challenge" rather
    /// than "this challenge is unusable".
    pub fn is_search_failure(&self) -> bool {
        matches!(self, SolveError::Exhausted | SolveError::NotFound)
    }
}
