use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building corpora or computing deltas
#[derive(Error, Debug)]
pub enum StylometryError {
    #[error("authors, titles and texts must have equal length (got {authors}, {titles}, {texts})")]
    ShapeMismatch {
        authors: usize,
        titles: usize,
        texts: usize,
    },

    #[error("vocabulary size must be a positive integer")]
    InvalidVocabularySize,

    #[error("invalid token pattern `{pattern}`: {source}")]
    InvalidTokenPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("tokenizer must be a valid expression or a callable: {0}")]
    InvalidTokenizer(String),

    #[error("no test corpus was supplied to the delta engine")]
    MissingTestCorpus,

    #[error("path does not exist: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StylometryError>;
