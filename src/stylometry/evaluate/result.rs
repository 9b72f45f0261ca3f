use std::{collections::HashMap, fmt, sync::Arc};

use serde::Serialize;

use crate::stylometry::corpus::document::DocumentId;

/// One train document × test document distance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeltaRow {
    pub train_id: DocumentId,
    pub train_author: Arc<str>,
    pub train_title: Arc<str>,
    pub test_id: DocumentId,
    pub test_author: Arc<str>,
    pub test_title: Arc<str>,
    pub delta: f64,
}

/// Document-level Burrows' Delta table, ascending by delta
///
/// Holds at most `train_docs × test_docs` rows: pairs without a shared
/// vocabulary token have no defined distance and are left out.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DeltaResult {
    rows: Vec<DeltaRow>,
}

impl DeltaResult {
    /// sort ascending (stable, NaN dropped)
    pub(crate) fn from_unsorted(mut rows: Vec<DeltaRow>) -> Self {
        rows.retain(|r| !r.delta.is_nan());
        rows.sort_by(|a, b| a.delta.total_cmp(&b.delta));
        DeltaResult { rows }
    }

    pub fn rows(&self) -> &[DeltaRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<DeltaRow> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DeltaRow> {
        self.rows.iter()
    }

    /// rows of one test document, closest first
    pub fn for_test(&self, test_id: DocumentId) -> impl Iterator<Item = &DeltaRow> + '_ {
        self.rows.iter().filter(move |r| r.test_id == test_id)
    }

    /// closest train document of a test document
    pub fn closest_for(&self, test_id: &DocumentId) -> Option<&DeltaRow> {
        self.for_test(*test_id).next()
    }

    /// keep the first `n` rows
    pub fn truncate(&mut self, n: usize) {
        self.rows.truncate(n);
    }
}

impl<'a> IntoIterator for &'a DeltaResult {
    type Item = &'a DeltaRow;
    type IntoIter = std::slice::Iter<'a, DeltaRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl fmt::Display for DeltaResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>10}  {:<24} {:<32} {:<24} {:<32}", "delta", "train author", "train title", "test author", "test title")?;
        for r in &self.rows {
            writeln!(
                f,
                "{:>10.6}  {:<24} {:<32} {:<24} {:<32}",
                r.delta, r.train_author, r.train_title, r.test_author, r.test_title
            )?;
        }
        Ok(())
    }
}

/// One author profile × test document distance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorDeltaRow {
    pub author: Arc<str>,
    pub test_id: DocumentId,
    pub test_author: Arc<str>,
    pub test_title: Arc<str>,
    pub delta: f64,
}

/// Author-level Burrows' Delta table, ascending by delta
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct AuthorDeltas {
    rows: Vec<AuthorDeltaRow>,
    // author -> test document -> row
    #[serde(skip)]
    index: HashMap<Arc<str>, HashMap<DocumentId, usize>>,
}

impl AuthorDeltas {
    pub(crate) fn from_unsorted(mut rows: Vec<AuthorDeltaRow>) -> Self {
        rows.retain(|r| !r.delta.is_nan());
        rows.sort_by(|a, b| a.delta.total_cmp(&b.delta));
        let mut index: HashMap<Arc<str>, HashMap<DocumentId, usize>> = HashMap::new();
        for (i, r) in rows.iter().enumerate() {
            index.entry(Arc::clone(&r.author)).or_default().insert(r.test_id, i);
        }
        AuthorDeltas { rows, index }
    }

    pub fn rows(&self) -> &[AuthorDeltaRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AuthorDeltaRow> {
        self.rows.iter()
    }

    /// delta between an author profile and a test document
    pub fn get(&self, author: &str, test_id: &DocumentId) -> Option<f64> {
        self.index
            .get(author)
            .and_then(|by_test| by_test.get(test_id))
            .map(|&i| self.rows[i].delta)
    }

    /// rows of one author, closest test document first
    pub fn for_author<'a>(&'a self, author: &'a str) -> impl Iterator<Item = &'a AuthorDeltaRow> + 'a {
        self.rows.iter().filter(move |r| &*r.author == author)
    }

    /// closest author profile of a test document
    pub fn closest_author(&self, test_id: &DocumentId) -> Option<&AuthorDeltaRow> {
        self.rows.iter().find(|r| r.test_id == *test_id)
    }

    pub fn truncate(&mut self, n: usize) {
        self.rows.truncate(n);
        for by_test in self.index.values_mut() {
            by_test.retain(|_, i| *i < n);
        }
        self.index.retain(|_, by_test| !by_test.is_empty());
    }
}

impl PartialEq for AuthorDeltas {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
    }
}

impl fmt::Display for AuthorDeltas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>10}  {:<24} {:<24} {:<32}", "delta", "author", "test author", "test title")?;
        for r in &self.rows {
            writeln!(
                f,
                "{:>10.6}  {:<24} {:<24} {:<32}",
                r.delta, r.author, r.test_author, r.test_title
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(delta: f64, test_id: DocumentId, train: &str) -> DeltaRow {
        DeltaRow {
            train_id: DocumentId::new(),
            train_author: train.into(),
            train_title: "t".into(),
            test_id,
            test_author: "?".into(),
            test_title: "q".into(),
            delta,
        }
    }

    #[test]
    fn sorted_ascending_and_stable() {
        let q = DocumentId::new();
        let result = DeltaResult::from_unsorted(vec![
            row(0.5, q, "a"),
            row(0.1, q, "b"),
            row(0.5, q, "c"),
            row(f64::NAN, q, "d"),
        ]);
        let order: Vec<&str> = result.iter().map(|r| &*r.train_author).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
        assert_eq!(&*result.closest_for(&q).unwrap().train_author, "b");
        assert!(result.closest_for(&DocumentId::new()).is_none());
    }

    #[test]
    fn closest_for_outlives_the_id_borrow() {
        let q = DocumentId::new();
        let result = DeltaResult::from_unsorted(vec![row(0.3, q, "a"), row(0.2, q, "b")]);
        let closest = {
            let id = q;
            result.closest_for(&id)
        };
        assert_eq!(&*closest.unwrap().train_author, "b");
        assert_eq!(result.for_test(q).count(), 2);
    }

    #[test]
    fn author_lookup() {
        let q1 = DocumentId::new();
        let q2 = DocumentId::new();
        let mk = |author: &str, test_id, delta| AuthorDeltaRow {
            author: author.into(),
            test_id,
            test_author: "?".into(),
            test_title: "q".into(),
            delta,
        };
        let table = AuthorDeltas::from_unsorted(vec![
            mk("austen", q1, 0.9),
            mk("bronte", q1, 0.3),
            mk("austen", q2, 0.2),
            mk("bronte", q2, 0.8),
        ]);
        assert_eq!(table.get("austen", &q1), Some(0.9));
        assert_eq!(table.get("bronte", &q2), Some(0.8));
        assert_eq!(table.get("dickens", &q2), None);
        assert_eq!(&*table.closest_author(&q1).unwrap().author, "bronte");
        assert_eq!(&*table.closest_author(&q2).unwrap().author, "austen");
        assert_eq!(table.for_author("austen").count(), 2);
    }

    #[test]
    fn truncated_author_table_drops_lookups() {
        let q1 = DocumentId::new();
        let q2 = DocumentId::new();
        let mk = |author: &str, test_id, delta| AuthorDeltaRow {
            author: author.into(),
            test_id,
            test_author: "?".into(),
            test_title: "q".into(),
            delta,
        };
        let mut table = AuthorDeltas::from_unsorted(vec![
            mk("austen", q1, 0.9),
            mk("bronte", q1, 0.3),
            mk("austen", q2, 0.2),
        ]);
        table.truncate(2);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("austen", &q2), Some(0.2));
        assert_eq!(table.get("bronte", &q1), Some(0.3));
        assert_eq!(table.get("austen", &q1), None);
    }

    #[test]
    fn display_has_one_line_per_row() {
        let q = DocumentId::new();
        let result = DeltaResult::from_unsorted(vec![row(0.25, q, "a"), row(0.5, q, "b")]);
        let text = result.to_string();
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("0.250000"));
    }
}
