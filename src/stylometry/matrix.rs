use indexmap::IndexMap;
use rayon::prelude::*;

use crate::stylometry::{
    corpus::document::{Document, DocumentId, DocumentLabel},
    vocab::Vocabulary,
};

/// Dense documents × vocabulary matrix stored row-major
///
/// Rows carry the document label as an immutable sidecar; columns are exactly
/// the tokens of `vocabulary`, in rank order.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledMatrix<N> {
    rows: Vec<DocumentLabel>,
    row_index: IndexMap<DocumentId, usize>,
    vocabulary: Vocabulary,
    values: Vec<N>,
}

/// per-document counts of vocabulary tokens
pub type FrequencyMatrix = LabeledMatrix<u32>;

impl<N: Copy> LabeledMatrix<N> {
    /// # Arguments
    /// * `rows` - row labels
    /// * `vocabulary` - column tokens
    /// * `values` - row-major cells, `rows.len() * vocabulary.len()` of them
    pub(crate) fn from_rows(rows: Vec<DocumentLabel>, vocabulary: Vocabulary, values: Vec<N>) -> Self {
        debug_assert_eq!(values.len(), rows.len() * vocabulary.len());
        let row_index = rows.iter().enumerate().map(|(i, l)| (l.id, i)).collect();
        LabeledMatrix {
            rows,
            row_index,
            vocabulary,
            values,
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn labels(&self) -> &[DocumentLabel] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.vocabulary.len()
    }

    /// row of a document, in column order
    pub fn row(&self, index: usize) -> &[N] {
        let w = self.n_cols();
        &self.values[index * w..(index + 1) * w]
    }

    pub fn row_of(&self, id: &DocumentId) -> Option<&[N]> {
        self.row_index.get(id).map(|&i| self.row(i))
    }

    /// iterate `(label, row)` in document order
    pub fn iter_rows(&self) -> impl Iterator<Item = (&DocumentLabel, &[N])> + '_ {
        self.rows.iter().enumerate().map(move |(i, l)| (l, self.row(i)))
    }

    /// cell value
    ///
    /// `None` only when the document or the token is not part of the matrix
    pub fn get(&self, id: &DocumentId, token: &str) -> Option<N> {
        let col = self.vocabulary.index_of(token)?;
        self.row_of(id).map(|row| row[col])
    }

    /// one column across all documents
    pub fn column(&self, col: usize) -> impl ExactSizeIterator<Item = N> + Clone + '_ {
        let w = self.n_cols();
        (0..self.n_rows()).map(move |r| self.values[r * w + col])
    }
}

/// Count vocabulary tokens per document
///
/// Tokens outside the vocabulary are ignored; every column exists for every
/// document and defaults to 0. Parallel over documents.
pub fn build_frequency_matrix(documents: &[Document], vocabulary: &Vocabulary) -> FrequencyMatrix {
    let width = vocabulary.len();
    let values: Vec<u32> = documents
        .par_iter()
        .flat_map_iter(|doc| {
            let mut row = vec![0u32; width];
            for tok in doc.tokens().unwrap_or_default() {
                if let Some(col) = vocabulary.index_of(tok) {
                    row[col] += 1;
                }
            }
            row
        })
        .collect();
    let rows = documents.iter().map(|d| d.label().clone()).collect();
    log::debug!(
        "frequency matrix built: {} documents x {} tokens",
        documents.len(),
        width
    );
    LabeledMatrix::from_rows(rows, vocabulary.clone(), values)
}
