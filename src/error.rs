//! Error types for patricia-dict

use thiserror::Error;

use crate::WordId;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Failure of a dictionary operation.
///
/// Every variant is recoverable: the trie is left exactly as it was before
/// the failing call.
#[derive(Error, Debug)]
pub enum Error {
    /// The word (direct or derived) is already stored, or is empty.
    #[error("word already present")]
    Duplicate,

    /// The id was never issued, or its word has been deleted.
    #[error("unknown word id: {0}")]
    UnknownId(WordId),

    /// Derive offsets do not select a substring of the source word.
    #[error("invalid range {start}..={end} for word of length {len}")]
    InvalidRange {
        /// First offset requested.
        start: usize,
        /// Last offset requested (inclusive).
        end: usize,
        /// Length of the source word.
        len: usize,
    },

    /// The word contains a byte outside `a..=z` or exceeds the length limit.
    #[error("invalid word: {0}")]
    InvalidWord(String),

    /// The text arena could not grow.
    #[error("out of memory growing text arena by {0} bytes")]
    OutOfMemory(usize),

    /// I/O error while driving a dictionary session
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid word error
    pub fn invalid_word(msg: impl Into<String>) -> Self {
        Error::InvalidWord(msg.into())
    }

    /// Whether this error is one of the semantic rejections a caller is
    /// expected to report and move past.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Error::OutOfMemory(_) | Error::Io(_))
    }
}
