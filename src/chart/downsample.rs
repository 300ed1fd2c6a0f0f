//! Fixed-stride downsampling
//!
//! Keeps every `stride`-th row by position so the renderer never receives more
//! than the point budget per channel.

use chrono::NaiveDateTime;

use crate::data::{Matrix, TimeSeries};
use crate::error::{PlotError, Result};

/// Position-based subsample of a series
#[derive(Debug, Clone, PartialEq)]
pub struct DownsampledView {
    pub stride: usize,
    pub timestamps: Vec<NaiveDateTime>,
    pub matrix: Matrix,
}

impl DownsampledView {
    /// Number of sampled rows
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Downsample a whole series
    pub fn from_series(series: &TimeSeries, point_budget: usize) -> Result<Self> {
        downsample(series.timestamps(), series.matrix(), point_budget)
    }
}

/// Step between kept rows for `n` rows and a budget of `point_budget`
pub fn stride_for(n: usize, point_budget: usize) -> usize {
    if n <= point_budget {
        1
    } else {
        (n / point_budget.max(1)).max(1)
    }
}

/// Keep rows `0, stride, 2*stride, ...` of `timestamps` and `matrix`
pub fn downsample(
    timestamps: &[NaiveDateTime],
    matrix: &Matrix,
    point_budget: usize,
) -> Result<DownsampledView> {
    profiling::scope!("downsample");

    if point_budget == 0 {
        return Err(PlotError::InvalidPointBudget(point_budget));
    }
    if timestamps.len() != matrix.rows() {
        return Err(PlotError::ShapeMismatch {
            timestamps: timestamps.len(),
            rows: matrix.rows(),
        });
    }

    let stride = stride_for(timestamps.len(), point_budget);
    if stride == 1 {
        return Ok(DownsampledView {
            stride,
            timestamps: timestamps.to_vec(),
            matrix: matrix.clone(),
        });
    }

    Ok(DownsampledView {
        stride,
        timestamps: timestamps.iter().step_by(stride).copied().collect(),
        matrix: matrix.stride_rows(stride),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::source::generate_timestamps;
    use chrono::NaiveDate;

    fn series(n: usize) -> (Vec<NaiveDateTime>, Matrix) {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let ts = generate_timestamps(start, 60, n).unwrap();
        let col: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let doubled: Vec<f64> = col.iter().map(|v| v * 2.0).collect();
        (ts, Matrix::from_columns(&[col, doubled]).unwrap())
    }

    #[test]
    fn test_identity_under_budget() {
        let (ts, m) = series(3);
        let view = downsample(&ts, &m, 5000).unwrap();
        assert_eq!(view.stride, 1);
        assert_eq!(view.timestamps, ts);
        assert_eq!(view.matrix, m);
    }

    #[test]
    fn test_exact_multiple() {
        let (ts, m) = series(10_000);
        let view = downsample(&ts, &m, 5000).unwrap();
        assert_eq!(view.stride, 2);
        assert_eq!(view.len(), 5000);
        assert_eq!(view.matrix.rows(), 5000);
        assert_eq!(view.timestamps[1], ts[2]);
        assert_eq!(view.matrix.row(4999), Some(&[9998.0, 19996.0][..]));
    }

    #[test]
    fn test_length_is_ceil_of_n_over_stride() {
        for (n, budget) in [(10_001, 5000), (7, 3), (12_345, 1000), (5001, 5000)] {
            let (ts, m) = series(n);
            let view = downsample(&ts, &m, budget).unwrap();
            assert_eq!(view.len(), n.div_ceil(view.stride), "n={} budget={}", n, budget);
            for (i, t) in view.timestamps.iter().enumerate() {
                assert_eq!(*t, ts[i * view.stride]);
                assert_eq!(view.matrix.row(i), m.row(i * view.stride));
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let (ts, m) = series(12_345);
        let a = downsample(&ts, &m, 700).unwrap();
        let b = downsample(&ts, &m, 700).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_stride_monotonic_in_budget() {
        let n = 10_007;
        let mut last = 0;
        for budget in (1..=12_000).rev().step_by(37) {
            let stride = stride_for(n, budget);
            assert!(stride >= last, "budget {} gave stride {} < {}", budget, stride, last);
            last = stride;
        }
        assert_eq!(stride_for(n, 1), n);
    }

    #[test]
    fn test_shape_mismatch() {
        let (ts, _) = series(4);
        let (_, m) = series(5);
        let err = downsample(&ts, &m, 10).unwrap_err();
        assert!(matches!(
            err,
            PlotError::ShapeMismatch {
                timestamps: 4,
                rows: 5
            }
        ));
    }

    #[test]
    fn test_zero_budget_rejected() {
        let (ts, m) = series(4);
        assert!(matches!(
            downsample(&ts, &m, 0),
            Err(PlotError::InvalidPointBudget(0))
        ));
    }
}
