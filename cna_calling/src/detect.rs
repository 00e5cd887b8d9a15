//! Gain/loss detection by per-gene z-score thresholding.

use ndarray::{Array2, ArrayView1, Axis};
use ndarray_stats::interpolate::Linear;
use ndarray_stats::Quantile1dExt;
use noisy_float::types::{n64, N64};

/// Default z-score threshold for calling a gain or loss.
pub const DEFAULT_Z_SCORE_THRESHOLD: f64 = 2.0;

/// Floor for the per-column standard deviation, so constant columns do not
/// divide by zero (and produce no calls).
const MIN_COLUMN_STD: f64 = 1e-6;

/// Threshold per-gene z-scores into gain and loss call matrices.
///
/// For each column of the smoothed matrix, z = (value - column median) /
/// column std, with the std computed across all cells and floored at 1e-6.
/// Gains are z strictly above the threshold, losses strictly below its
/// negation; a value exactly at the threshold is neither. The two returned
/// matrices have the input's shape, and empty input yields empty output.
pub fn find_cnas(smoothed: &Array2<f64>, z_score_threshold: f64) -> (Array2<bool>, Array2<bool>) {
    let (n_cells, n_genes) = smoothed.dim();
    let mut gains = Array2::from_elem((n_cells, n_genes), false);
    let mut losses = Array2::from_elem((n_cells, n_genes), false);
    if n_cells == 0 || n_genes == 0 {
        return (gains, losses);
    }
    for (g, column) in smoothed.axis_iter(Axis(1)).enumerate() {
        let median = column_median(&column);
        let std = column_std(&column).max(MIN_COLUMN_STD);
        for (c, &value) in column.iter().enumerate() {
            let z = (value - median) / std;
            if z > z_score_threshold {
                gains[[c, g]] = true;
            } else if z < -z_score_threshold {
                losses[[c, g]] = true;
            }
        }
    }
    (gains, losses)
}

fn column_median(column: &ArrayView1<'_, f64>) -> f64 {
    let mut values = column.mapv(n64);
    values
        .quantile_mut(n64(0.5), &Linear)
        .map_or(f64::NAN, N64::raw)
}

/// Population standard deviation (ddof = 0).
fn column_std(column: &ArrayView1<'_, f64>) -> f64 {
    column.std(0.0)
}
