use std::collections::HashSet;

use crate::stylometry::token::TokenizerKind;

/// default vocabulary size (most frequent words kept)
pub const DEFAULT_VOCABULARY_SIZE: usize = 500;

/// default admission pattern: lower-case alphabetic, at least two letters
pub const DEFAULT_TOKEN_PATTERN: &str = r"^[a-z][a-z]+$";

/// Configuration of a corpus
///
/// Frozen behind an `Arc` once a `Corpus` is built; the pipeline only reads it.
#[derive(Debug, Clone)]
pub struct CorpusConfig {
    /// size of the vocabulary (top-k most frequent tokens)
    pub vocabulary_size: usize,
    /// tokens never admitted to the vocabulary
    pub excluded_tokens: HashSet<String>,
    /// regex a token must match to be admitted
    pub token_pattern: String,
    pub tokenizer: TokenizerKind,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        CorpusConfig {
            vocabulary_size: DEFAULT_VOCABULARY_SIZE,
            excluded_tokens: HashSet::new(),
            token_pattern: DEFAULT_TOKEN_PATTERN.to_string(),
            tokenizer: TokenizerKind::default(),
        }
    }
}

impl CorpusConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vocabulary_size(mut self, vocabulary_size: usize) -> Self {
        self.vocabulary_size = vocabulary_size;
        self
    }

    pub fn with_excluded_tokens<I, T>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.excluded_tokens = tokens.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_token_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.token_pattern = pattern.into();
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: TokenizerKind) -> Self {
        self.tokenizer = tokenizer;
        self
    }
}
