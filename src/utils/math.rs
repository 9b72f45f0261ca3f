use num::{Num, ToPrimitive};

/// Column statistics used for standardization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStats {
    pub mean: f64,
    /// sample standard deviation (n - 1), `None` when fewer than two values
    pub std: Option<f64>,
}

impl ColumnStats {
    /// Compute mean and sample standard deviation of a column
    ///
    /// # Arguments
    /// * `values` - column values
    ///
    /// # Returns
    /// * `ColumnStats` - mean is `0.0` for an empty column
    pub fn sample<N, I>(values: I) -> Self
    where
        N: Num + ToPrimitive + Copy,
        I: IntoIterator<Item = N>,
        I::IntoIter: Clone,
    {
        let iter = values.into_iter();
        let mut n = 0usize;
        let mut sum = 0.0f64;
        for v in iter.clone() {
            sum += to_f64(v);
            n += 1;
        }
        if n == 0 {
            return ColumnStats { mean: 0.0, std: None };
        }
        let mean = sum / n as f64;
        if n < 2 {
            return ColumnStats { mean, std: None };
        }
        // 二段階で計算 (桁落ち対策)
        let sq: f64 = iter
            .map(|v| {
                let d = to_f64(v) - mean;
                d * d
            })
            .sum();
        ColumnStats {
            mean,
            std: Some((sq / (n - 1) as f64).sqrt()),
        }
    }

    /// Standardize one value
    ///
    /// zero, undefined and non-finite results all collapse to `0.0`
    #[inline]
    pub fn z_score<N>(&self, value: N) -> f64
    where
        N: Num + ToPrimitive + Copy,
    {
        match self.std {
            Some(std) if std > 0.0 => {
                let z = (to_f64(value) - self.mean) / std;
                if z.is_finite() { z } else { 0.0 }
            }
            _ => 0.0,
        }
    }
}

/// Arithmetic mean, `None` for an empty input
#[inline]
pub fn mean<N, I>(values: I) -> Option<f64>
where
    N: Num + ToPrimitive + Copy,
    I: IntoIterator<Item = N>,
{
    let (sum, n) = values
        .into_iter()
        .fold((0.0f64, 0usize), |(s, n), v| (s + to_f64(v), n + 1));
    if n == 0 { None } else { Some(sum / n as f64) }
}

/// Mean absolute difference over paired values
/// d(a, b) = Σ|a_i - b_i| / n
///
/// `None` if there is no pair (the distance is undefined)
#[inline]
pub fn mean_abs_diff<I>(pairs: I) -> Option<f64>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    mean(pairs.into_iter().map(|(a, b)| (a - b).abs()))
}

#[inline(always)]
fn to_f64<N: ToPrimitive>(v: N) -> f64 {
    v.to_f64().unwrap_or(f64::NAN)
}
