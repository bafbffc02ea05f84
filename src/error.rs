use std::io;

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors for corpus preprocessing and model postprocessing.
///
/// Every failure surfaces synchronously to the immediate caller. There is no
/// retry or degraded-mode path anywhere in this crate, and no error is
/// logged-and-swallowed.
#[derive(Debug, Error)]
pub enum Error {
    /// The caller-supplied token pattern did not compile.
    #[error("invalid token pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// A corpus and its document labels have different lengths.
    #[error("expected {expected} document labels, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// The token already has an identifier. Token2Id is append-only.
    #[error("token {0:?} already has an id; look it up with get() instead")]
    DuplicateToken(String),

    /// The vocabulary does not line up with the topic-word matrix columns.
    #[error("vocabulary has {vocabulary} entries but the topic-word matrix has {columns} columns")]
    VocabularyMismatch { vocabulary: usize, columns: usize },

    /// The path does not carry the extension the format requires.
    #[error("{0} is not a Matrix Market file (expected a .mm extension)")]
    FileExtension(String),

    /// Matrix Market content that does not follow the coordinate format.
    #[error("malformed Matrix Market content: {0}")]
    MatrixMarket(String),

    /// A token2id CSV row that is not `id,token`.
    #[error("malformed token2id row: {0}")]
    Token2IdFormat(String),

    /// Model output (MALLET files, dictionaries) that cannot be interpreted.
    #[error("malformed model output: {0}")]
    ModelFormat(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}
