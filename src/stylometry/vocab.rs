use std::{collections::HashSet, fmt, sync::Arc};

use indexmap::{IndexMap, IndexSet};
use rayon::prelude::*;
use regex::Regex;
use serde::{Serialize, Serializer};

use crate::{
    error::{Result, StylometryError},
    stylometry::corpus::{config::CorpusConfig, document::Document},
};

/// Ranked set of the most frequent admitted tokens of a reference corpus
///
/// Immutable and cheap to clone: every clone shares the same token set, so a
/// vocabulary installed on a corpus can never be torn by another owner.
/// Column order of frequency and z-score matrices is the rank order.
#[derive(Clone, Default)]
pub struct Vocabulary {
    tokens: Arc<IndexSet<String>>,
}

impl Vocabulary {
    /// Build from tokens already in rank order, duplicates keep their first rank
    pub fn from_ranked<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Vocabulary {
            tokens: Arc::new(tokens.into_iter().map(Into::into).collect()),
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    /// column index of a token
    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.tokens.get_index_of(token)
    }

    pub fn token(&self, index: usize) -> Option<&str> {
        self.tokens.get_index(index).map(String::as_str)
    }

    /// tokens in rank order
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.tokens.iter().map(String::as_str)
    }

    /// true when both handles point at the same token set
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.tokens, &other.tokens)
    }
}

/// Equal when the same tokens appear in the same rank order
impl PartialEq for Vocabulary {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.tokens.iter().eq(other.tokens.iter())
    }
}

impl Eq for Vocabulary {}

impl fmt::Debug for Vocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.tokens.iter()).finish()
    }
}

impl Serialize for Vocabulary {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.tokens.iter())
    }
}

/// Admission rule for vocabulary candidates
///
/// The pattern is searched, not implicitly anchored: `[a-z]+` admits `a1`.
#[derive(Debug, Clone)]
pub struct TokenFilter {
    excluded: HashSet<String>,
    pattern: Regex,
}

impl TokenFilter {
    pub fn new(excluded: HashSet<String>, pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|source| StylometryError::InvalidTokenPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(TokenFilter { excluded, pattern })
    }

    pub fn from_config(config: &CorpusConfig) -> Result<Self> {
        Self::new(config.excluded_tokens.clone(), &config.token_pattern)
    }

    #[inline]
    pub fn admits(&self, token: &str) -> bool {
        !self.excluded.contains(token) && self.pattern.is_match(token)
    }
}

/// Select the `k` most frequent admitted tokens of a set of documents
///
/// Counts are totals over all documents. Ties keep the order in which tokens
/// were first seen (document order, then position). Fewer than `k` distinct
/// tokens yields all of them. Untokenized documents contribute nothing.
pub fn select_vocabulary(documents: &[Document], filter: &TokenFilter, k: usize) -> Vocabulary {
    // ドキュメント単位で並列カウント (出現順を保持)
    let per_doc: Vec<IndexMap<&str, u64>> = documents
        .par_iter()
        .map(|doc| {
            let mut counts: IndexMap<&str, u64> = IndexMap::new();
            for tok in doc.tokens().unwrap_or_default() {
                if filter.admits(tok) {
                    *counts.entry(tok.as_str()).or_insert(0) += 1;
                }
            }
            counts
        })
        .collect();

    // ドキュメント順にマージすると挿入順 = 初出順
    let mut totals: IndexMap<&str, u64> = IndexMap::new();
    for counts in per_doc {
        for (tok, n) in counts {
            *totals.entry(tok).or_insert(0) += n;
        }
    }

    // stable
    totals.sort_by(|_, a, _, b| b.cmp(a));
    Vocabulary::from_ranked(totals.keys().take(k).copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(tokens: &[&str]) -> Document {
        let mut d = Document::new("A".into(), "T".into(), tokens.join(" "));
        d.set_tokens(tokens.iter().map(|t| t.to_string()).collect());
        d
    }

    fn all_alpha() -> TokenFilter {
        TokenFilter::new(HashSet::new(), r"^[a-z]+$").unwrap()
    }

    #[test]
    fn ranks_by_count_then_first_seen() {
        let docs = vec![doc(&["the", "cat", "sat"]), doc(&["the", "dog", "sat"])];
        let vocab = select_vocabulary(&docs, &all_alpha(), 10);
        assert_eq!(vocab.iter().collect::<Vec<_>>(), vec!["the", "sat", "cat", "dog"]);
    }

    #[test]
    fn truncates_to_k() {
        let docs = vec![doc(&["b", "a", "a", "c", "c", "c"])];
        let vocab = select_vocabulary(&docs, &all_alpha(), 2);
        assert_eq!(vocab.iter().collect::<Vec<_>>(), vec!["c", "a"]);
    }

    #[test]
    fn applies_exclusion_and_pattern() {
        let filter = TokenFilter::new(["is".to_string()].into_iter().collect(), r"^[A-Za-z]+$").unwrap();
        let docs = vec![doc(&["This", "is", "a", "test!"]), doc(&["This", "is", "another", "test", "123"])];
        let vocab = select_vocabulary(&docs, &filter, 10);
        assert!(!vocab.contains("is"));
        assert!(!vocab.contains("123"));
        assert!(!vocab.contains("test!"));
        assert!(vocab.iter().all(|t| t.chars().all(|c| c.is_ascii_alphabetic())));
        assert_eq!(vocab.iter().collect::<Vec<_>>(), vec!["This", "a", "another", "test"]);
    }

    #[test]
    fn empty_documents_give_empty_vocabulary() {
        let vocab = select_vocabulary(&[], &all_alpha(), 10);
        assert!(vocab.is_empty());
    }

    #[test]
    fn pattern_is_searched_unless_anchored() {
        let loose = TokenFilter::new(HashSet::new(), "[a-z]+").unwrap();
        assert!(loose.admits("a1"));
        let anchored = TokenFilter::new(HashSet::new(), "^[a-z]+$").unwrap();
        assert!(!anchored.admits("a1"));
        assert!(anchored.admits("ab"));
    }

    #[test]
    fn invalid_pattern() {
        let err = TokenFilter::new(HashSet::new(), "[").unwrap_err();
        assert!(matches!(err, StylometryError::InvalidTokenPattern { .. }));
    }

    #[test]
    fn equality_is_order_sensitive() {
        let a = Vocabulary::from_ranked(["x", "y"]);
        let b = Vocabulary::from_ranked(["x", "y"]);
        let c = Vocabulary::from_ranked(["y", "x"]);
        assert_eq!(a, b);
        assert!(!a.ptr_eq(&b));
        assert_ne!(a, c);
        assert!(a.ptr_eq(&a.clone()));
    }
}
