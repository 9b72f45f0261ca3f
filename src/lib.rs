/// This crate is a stylometric authorship analysis engine using Burrows' Delta.
pub mod error;
pub mod ingest;
pub mod stylometry;
pub mod utils;

/// Burrows' Delta Engine
/// The top-level struct of this crate. It compares a train (reference) corpus
/// with a test (query) corpus and reports how stylistically close every pair is.
///
/// Internally, it holds:
/// - The train corpus
/// - The optional test corpus
/// - A `DeltaConfig` selecting how vocabularies are aligned
///
/// By default the test corpus is assigned the train vocabulary before
/// normalization, so both z-score matrices share their columns.
/// Smaller delta means closer style.
pub use stylometry::{BurrowsDelta, DeltaConfig, VocabularyAlignment};

/// Corpus
/// An ordered collection of documents with lazily computed, cached artifacts:
/// - Token sequences of each document
/// - The vocabulary (the most frequent admitted tokens)
/// - The frequency matrix (documents × vocabulary counts)
/// - The z-score matrix (per-column standardized frequencies)
///
/// Its progress is tracked by `CorpusStage`; assigning a different vocabulary
/// drops the frequency and z-score caches.
pub use stylometry::corpus::{config::CorpusConfig, document::Document, document::DocumentId, Corpus, CorpusStage};

/// Tokenizer Trait
/// Splits a text into an ordered token sequence.
///
/// Any `Fn(&str) -> Vec<String>` closure is a tokenizer. `TokenizerKind`
/// selects between the built-in tokenizers (pronoun free, whitespace, regex)
/// and a user supplied one.
pub use stylometry::token::{Tokenizer, TokenizerKind};

/// Vocabulary
/// An immutable ordered set of tokens, shared by reference between matrices
/// and corpora. The order is the rank (most frequent first).
pub use stylometry::vocab::{select_vocabulary, Vocabulary};

/// Frequency and Z-Score Matrices
/// Row-major documents × vocabulary matrices labeled by document.
/// - `FrequencyMatrix`: raw counts
/// - `ZScoreMatrix`: per-column z-scores of the counts
pub use stylometry::{
    matrix::{build_frequency_matrix, FrequencyMatrix},
    zscore::{normalize, ZScoreMatrix},
};

/// Delta Results
/// Data structures holding the computed distances, ascending by delta.
/// - `DeltaResult` / `DeltaRow`: train document × test document
/// - `AuthorDeltas` / `AuthorDeltaRow`: train author profile × test document
pub use stylometry::evaluate::{
    delta::{author_deltas, document_deltas},
    result::{AuthorDeltaRow, AuthorDeltas, DeltaResult, DeltaRow},
};

/// Errors
pub use error::{Result, StylometryError};

/// Document ingestion from `author_-_title.txt` files
pub use ingest::{load_documents, RawDocuments};
