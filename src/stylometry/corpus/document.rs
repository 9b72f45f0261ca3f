use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque, globally unique document identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// fresh random (v4) id
    pub fn new() -> Self {
        DocumentId(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity and attribution of a document
///
/// Row label shared by frequency and z-score matrices and by delta results.
/// Cloning is cheap (reference counted strings).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentLabel {
    pub id: DocumentId,
    pub author: Arc<str>,
    pub title: Arc<str>,
}

/// One unit of analysis
///
/// Raw text and attribution are fixed at creation. `tokens` stays `None`
/// until the owning corpus tokenizes it and is only replaced by an explicit
/// re-tokenization of that corpus.
#[derive(Debug, Clone)]
pub struct Document {
    label: DocumentLabel,
    text: Arc<str>,
    tokens: Option<Arc<[String]>>,
}

impl Document {
    pub(crate) fn new(author: String, title: String, text: String) -> Self {
        Document {
            label: DocumentLabel {
                id: DocumentId::new(),
                author: author.into(),
                title: title.into(),
            },
            text: text.into(),
            tokens: None,
        }
    }

    pub fn id(&self) -> DocumentId {
        self.label.id
    }

    pub fn author(&self) -> &str {
        &self.label.author
    }

    pub fn title(&self) -> &str {
        &self.label.title
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn label(&self) -> &DocumentLabel {
        &self.label
    }

    /// `None` until tokenized
    pub fn tokens(&self) -> Option<&[String]> {
        self.tokens.as_deref()
    }

    /// number of tokens, 0 if not yet tokenized
    pub fn token_count(&self) -> usize {
        self.tokens.as_ref().map_or(0, |t| t.len())
    }

    pub(crate) fn set_tokens(&mut self, tokens: Vec<String>) {
        self.tokens = Some(tokens.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = Document::new("A".into(), "T".into(), "x".into());
        let b = Document::new("A".into(), "T".into(), "x".into());
        assert_ne!(a.id(), b.id());
        assert_eq!(a.id().as_uuid().get_version_num(), 4);
    }

    #[test]
    fn tokens_absent_until_set() {
        let mut doc = Document::new("A".into(), "T".into(), "the cat".into());
        assert!(doc.tokens().is_none());
        assert_eq!(doc.token_count(), 0);
        doc.set_tokens(vec!["the".into(), "cat".into()]);
        assert_eq!(doc.tokens().unwrap(), ["the".to_string(), "cat".to_string()]);
        assert_eq!(doc.token_count(), 2);
        assert_eq!(doc.text(), "the cat");
    }
}
