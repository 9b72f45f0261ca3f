use std::sync::Arc;

use indexmap::IndexMap;
use log::{debug, warn};
use rayon::prelude::*;

use crate::{
    stylometry::{
        evaluate::result::{AuthorDeltaRow, AuthorDeltas, DeltaResult, DeltaRow},
        vocab::Vocabulary,
        zscore::ZScoreMatrix,
    },
    utils::math::{mean, mean_abs_diff},
};

/// Column pairs `(train_col, test_col)` of the tokens both vocabularies hold,
/// in train rank order
fn shared_columns(train: &Vocabulary, test: &Vocabulary) -> Vec<(usize, usize)> {
    if train == test {
        return (0..train.len()).map(|i| (i, i)).collect();
    }
    train
        .iter()
        .enumerate()
        .filter_map(|(i, tok)| test.index_of(tok).map(|j| (i, j)))
        .collect()
}

/// Burrows' Delta of two z-score rows over the shared columns
/// Δ(a, b) = Σ|a_i - b_i| / n
#[inline]
fn delta(a: &[f64], b: &[f64], columns: &[(usize, usize)]) -> Option<f64> {
    mean_abs_diff(columns.iter().map(|&(i, j)| (a[i], b[j])))
}

fn warn_if_disjoint(columns: &[(usize, usize)], train: &ZScoreMatrix, test: &ZScoreMatrix) {
    if columns.is_empty() && train.n_rows() > 0 && test.n_rows() > 0 {
        warn!(
            "train and test share no vocabulary token, {} pairs have no delta",
            train.n_rows() * test.n_rows()
        );
    }
}

/// Delta between every train document and every test document
///
/// Only tokens present in both matrices are compared, so corpora normalized
/// with different vocabularies can still be compared on their overlap.
/// Parallel over train documents; the result is ascending by delta.
pub fn document_deltas(train: &ZScoreMatrix, test: &ZScoreMatrix) -> DeltaResult {
    let columns = shared_columns(train.vocabulary(), test.vocabulary());
    warn_if_disjoint(&columns, train, test);
    let columns = &columns;

    let rows: Vec<DeltaRow> = train
        .labels()
        .par_iter()
        .enumerate()
        .flat_map_iter(|(i, train_label)| {
            let a = train.row(i);
            test.iter_rows().filter_map(move |(test_label, b)| {
                delta(a, b, columns).map(|d| DeltaRow {
                    train_id: train_label.id,
                    train_author: Arc::clone(&train_label.author),
                    train_title: Arc::clone(&train_label.title),
                    test_id: test_label.id,
                    test_author: Arc::clone(&test_label.author),
                    test_title: Arc::clone(&test_label.title),
                    delta: d,
                })
            })
        })
        .collect();

    debug!(
        "document deltas: {} rows over {} shared tokens",
        rows.len(),
        columns.len()
    );
    DeltaResult::from_unsorted(rows)
}

/// Average z-score row per author, authors in first-seen order
pub fn author_profiles(train: &ZScoreMatrix) -> Vec<(Arc<str>, Vec<f64>)> {
    let mut groups: IndexMap<Arc<str>, Vec<usize>> = IndexMap::new();
    for (i, label) in train.labels().iter().enumerate() {
        groups.entry(Arc::clone(&label.author)).or_default().push(i);
    }
    let groups: Vec<(Arc<str>, Vec<usize>)> = groups.into_iter().collect();

    groups
        .into_par_iter()
        .map(|(author, rows)| {
            let profile: Vec<f64> = (0..train.n_cols())
                .map(|col| mean(rows.iter().map(|&r| train.row(r)[col])).unwrap_or(0.0))
                .collect();
            (author, profile)
        })
        .collect()
}

/// Delta between every author profile of the train corpus and every test document
///
/// Each author's documents are first collapsed into one profile by averaging
/// their z-scores per token; the metric is then the same as `document_deltas`.
pub fn author_deltas(train: &ZScoreMatrix, test: &ZScoreMatrix) -> AuthorDeltas {
    let columns = shared_columns(train.vocabulary(), test.vocabulary());
    warn_if_disjoint(&columns, train, test);
    let columns = &columns;
    let profiles = author_profiles(train);

    let rows: Vec<AuthorDeltaRow> = profiles
        .par_iter()
        .flat_map_iter(|(author, profile)| {
            test.iter_rows().filter_map(move |(test_label, b)| {
                delta(profile, b, columns).map(|d| AuthorDeltaRow {
                    author: Arc::clone(author),
                    test_id: test_label.id,
                    test_author: Arc::clone(&test_label.author),
                    test_title: Arc::clone(&test_label.title),
                    delta: d,
                })
            })
        })
        .collect();

    debug!(
        "author deltas: {} authors, {} rows",
        profiles.len(),
        rows.len()
    );
    AuthorDeltas::from_unsorted(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stylometry::{
        corpus::document::Document,
        matrix::build_frequency_matrix,
        zscore::normalize,
    };

    fn zscores(docs: &[(&str, &str)], vocab: &Vocabulary) -> ZScoreMatrix {
        let docs: Vec<Document> = docs
            .iter()
            .map(|(author, text)| {
                let mut d = Document::new(author.to_string(), text.to_string(), text.to_string());
                d.set_tokens(text.split_whitespace().map(str::to_string).collect());
                d
            })
            .collect();
        normalize(&build_frequency_matrix(&docs, vocab))
    }

    #[test]
    fn shared_columns_follow_train_order() {
        let a = Vocabulary::from_ranked(["x", "y", "z"]);
        let b = Vocabulary::from_ranked(["z", "w", "x"]);
        assert_eq!(shared_columns(&a, &b), vec![(0, 2), (2, 0)]);
        assert_eq!(shared_columns(&a, &a.clone()), vec![(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn delta_is_mean_absolute_difference() {
        let d = delta(&[1.0, -1.0, 0.0], &[0.0, 1.0, 0.0], &[(0, 0), (1, 1), (2, 2)]).unwrap();
        assert!((d - 1.0).abs() < 1e-12);
        assert_eq!(delta(&[1.0], &[0.0], &[]), None);
    }

    #[test]
    fn every_pair_is_scored() {
        let vocab = Vocabulary::from_ranked(["a", "b", "c"]);
        let train = zscores(&[("x", "a a b"), ("y", "b c c"), ("z", "a c")], &vocab);
        let test = zscores(&[("q", "a b"), ("r", "c c c")], &vocab);
        let result = document_deltas(&train, &test);
        assert_eq!(result.len(), 6);
        assert!(result.rows().windows(2).all(|w| w[0].delta <= w[1].delta));
    }

    #[test]
    fn disjoint_vocabularies_yield_no_rows() {
        let train = zscores(&[("x", "a b"), ("y", "b b")], &Vocabulary::from_ranked(["a", "b"]));
        let test = zscores(&[("q", "c d"), ("r", "d")], &Vocabulary::from_ranked(["c", "d"]));
        assert!(document_deltas(&train, &test).is_empty());
        assert!(author_deltas(&train, &test).is_empty());
    }

    #[test]
    fn partial_overlap_uses_shared_tokens_only() {
        let train = zscores(&[("x", "a b"), ("y", "a a")], &Vocabulary::from_ranked(["a", "b"]));
        let test = zscores(&[("q", "a c"), ("r", "c c a a a")], &Vocabulary::from_ranked(["c", "a"]));
        let result = document_deltas(&train, &test);
        assert_eq!(result.len(), 4);
        // only `a` is shared: train a = [-h, h], test a = [-h, h]
        let h = std::f64::consts::FRAC_1_SQRT_2;
        let mut deltas: Vec<f64> = result.iter().map(|r| r.delta).collect();
        deltas.sort_by(f64::total_cmp);
        assert!(deltas[0].abs() < 1e-12 && deltas[1].abs() < 1e-12);
        assert!((deltas[2] - 2.0 * h).abs() < 1e-12 && (deltas[3] - 2.0 * h).abs() < 1e-12);
    }

    #[test]
    fn author_profiles_average_zscores() {
        let vocab = Vocabulary::from_ranked(["a", "b"]);
        let train = zscores(&[("x", "a a"), ("y", "b"), ("x", "a b")], &vocab);
        let profiles = author_profiles(&train);
        assert_eq!(profiles.len(), 2);
        assert_eq!(&*profiles[0].0, "x");
        assert_eq!(&*profiles[1].0, "y");
        let expected: Vec<f64> = (0..2).map(|c| (train.row(0)[c] + train.row(2)[c]) / 2.0).collect();
        for c in 0..2 {
            assert!((profiles[0].1[c] - expected[c]).abs() < 1e-12);
            assert_eq!(profiles[1].1[c], train.row(1)[c]);
        }
    }

    #[test]
    fn author_deltas_cover_author_by_test() {
        let vocab = Vocabulary::from_ranked(["a", "b", "c"]);
        let train = zscores(&[("x", "a a b"), ("x", "a b b"), ("y", "c c b")], &vocab);
        let test = zscores(&[("q", "a a b c"), ("r", "c c c b")], &vocab);
        let result = author_deltas(&train, &test);
        assert_eq!(result.len(), 4);
        let q = test.labels()[0].id;
        let r = test.labels()[1].id;
        assert_eq!(&*result.closest_author(&q).unwrap().author, "x");
        assert_eq!(&*result.closest_author(&r).unwrap().author, "y");
        assert!(result.get("x", &q).unwrap() < result.get("y", &q).unwrap());
    }
}
