use rayon::prelude::*;

use crate::{
    stylometry::matrix::{FrequencyMatrix, LabeledMatrix},
    utils::math::ColumnStats,
};

/// per-document z-scores of vocabulary tokens
pub type ZScoreMatrix = LabeledMatrix<f64>;

/// Standardize every column of a frequency matrix
///
/// Each column uses its own mean and sample standard deviation (n - 1) over all
/// rows of the matrix. A column whose deviation is zero or undefined (a single
/// document corpus, a constant count) is all zeros. Parallel over columns.
pub fn normalize(frequency: &FrequencyMatrix) -> ZScoreMatrix {
    let n_rows = frequency.n_rows();
    let n_cols = frequency.n_cols();

    let columns: Vec<Vec<f64>> = (0..n_cols)
        .into_par_iter()
        .map(|col| {
            let stats = ColumnStats::sample(frequency.column(col));
            frequency.column(col).map(|v| stats.z_score(v)).collect()
        })
        .collect();

    // 列優先 -> 行優先
    let mut values = vec![0.0f64; n_rows * n_cols];
    for (col, column) in columns.into_iter().enumerate() {
        for (row, z) in column.into_iter().enumerate() {
            values[row * n_cols + col] = z;
        }
    }

    log::debug!("z-scores computed: {} documents x {} tokens", n_rows, n_cols);
    LabeledMatrix::from_rows(
        frequency.labels().to_vec(),
        frequency.vocabulary().clone(),
        values,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stylometry::{
        corpus::document::Document,
        matrix::build_frequency_matrix,
        vocab::Vocabulary,
    };

    fn matrix(texts: &[&str], vocab: &[&str]) -> FrequencyMatrix {
        let docs: Vec<Document> = texts
            .iter()
            .map(|t| {
                let mut d = Document::new("A".into(), "T".into(), t.to_string());
                d.set_tokens(t.split_whitespace().map(str::to_string).collect());
                d
            })
            .collect();
        build_frequency_matrix(&docs, &Vocabulary::from_ranked(vocab.iter().copied()))
    }

    #[test]
    fn nonzero_variance_columns_are_centered() {
        let m = matrix(&["a a b c", "a b b c d e", "d d d d e"], &["a", "b", "c", "d", "e"]);
        let z = normalize(&m);
        for col in 0..z.n_cols() {
            let mean: f64 = z.column(col).sum::<f64>() / z.n_rows() as f64;
            assert!(mean.abs() < 1e-12, "column {col} mean {mean}");
        }
        // a = [2, 1, 0]: mean 1, sample std 1
        assert_eq!(z.column(0).collect::<Vec<_>>(), vec![1.0, 0.0, -1.0]);
        // e = [0, 1, 1]
        let e: Vec<f64> = z.column(4).collect();
        let s = (1.0f64 / 3.0).sqrt();
        assert!((e[0] + 2.0 / 3.0 / s).abs() < 1e-12);
        assert!((e[1] - 1.0 / 3.0 / s).abs() < 1e-12);
    }

    #[test]
    fn zero_variance_column_is_exactly_zero() {
        let m = matrix(&["the cat", "the dog"], &["the", "cat"]);
        let z = normalize(&m);
        assert!(z.column(0).all(|v| v == 0.0));
        let half_sqrt2 = std::f64::consts::FRAC_1_SQRT_2;
        let cat: Vec<f64> = z.column(1).collect();
        assert!((cat[0] - half_sqrt2).abs() < 1e-12);
        assert!((cat[1] + half_sqrt2).abs() < 1e-12);
    }

    #[test]
    fn single_document_is_all_zero() {
        let m = matrix(&["the cat meows"], &["the", "sat", "cat", "dog"]);
        let z = normalize(&m);
        assert_eq!(z.row(0), &[0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn labels_and_vocabulary_carried_over() {
        let m = matrix(&["a", "b"], &["a", "b"]);
        let z = normalize(&m);
        assert_eq!(z.labels(), m.labels());
        assert!(z.vocabulary().ptr_eq(m.vocabulary()));
    }

    #[test]
    fn empty_matrix() {
        let m = matrix(&[], &["a"]);
        let z = normalize(&m);
        assert_eq!(z.n_rows(), 0);
        assert_eq!(z.n_cols(), 1);
    }
}
