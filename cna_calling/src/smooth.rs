//! Moving-average smoothing of expression along genomic position.

use cna_types::ExpressionMatrix;
use ndarray::{s, Array2, Axis};

/// Default smoothing window (genes), centered on each position.
pub const DEFAULT_WINDOW_SIZE: usize = 50;

/// Smooth expression along genomic position with a centered moving average.
///
/// Only genes with a present `chrom` participate. They are stable-sorted by
/// (chrom, start) with plain string ordering on chrom, so "10" sorts before
/// "2". Block contiguity downstream depends on this ordering staying
/// reproducible; it is deliberately not natural-sorted. The source matrix
/// is the `counts` layer when present, else the primary matrix.
///
/// The window at position `i` covers `[i - window_size/2, i + window_size/2]`
/// inclusive, clipped at both ends of the gene sequence (boundary windows
/// are simply smaller). `window_size == 0` is identity smoothing.
///
/// Returns the smoothed matrix (cells x selected genes) and, per smoothed
/// column, the gene's original annotation-table index.
pub fn smooth_expression(
    matrix: &ExpressionMatrix,
    window_size: usize,
) -> (Array2<f64>, Vec<usize>) {
    let annotations = matrix.annotations();
    let mut order: Vec<usize> = (0..annotations.len())
        .filter(|&i| annotations[i].chrom.is_some())
        .collect();
    order.sort_by(|&a, &b| {
        let key = |i: usize| (annotations[i].chrom.as_deref(), annotations[i].start);
        key(a).cmp(&key(b))
    });

    let source = matrix.counts();
    let expr = source.select(Axis(1), &order);
    let (n_cells, n_genes) = expr.dim();
    let mut smoothed = Array2::zeros((n_cells, n_genes));
    let half = window_size / 2;
    for i in 0..n_genes {
        let lo = i.saturating_sub(half);
        let hi = (i + half + 1).min(n_genes);
        let window = expr.slice(s![.., lo..hi]);
        let mean = window.sum_axis(Axis(1)) / (hi - lo) as f64;
        smoothed.column_mut(i).assign(&mean);
    }
    (smoothed, order)
}
