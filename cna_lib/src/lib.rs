//! End-to-end CNA screening pipeline.
//!
//! Annotate the container's genes with genomic coordinates, smooth
//! expression along genomic position, threshold per-gene z-scores into
//! gain/loss calls, and group the calls into contiguous per-cell blocks.
//! Lookup failures degrade to unannotated genes rather than aborting, so a
//! run always completes (possibly with an empty report).

use anyhow::Result;
use cna_calling::{find_cnas, group_cnas, smooth_expression};
use cna_calling::{DEFAULT_WINDOW_SIZE, DEFAULT_Z_SCORE_THRESHOLD};
use cna_types::{CnaReport, ExpressionMatrix};
use ensembl_lookup::{annotate_genes, LookupTransport};
use log::debug;
use std::path::Path;

/// Tuning knobs for one pipeline run.
#[derive(Debug, Clone)]
pub struct CnaParams {
    /// Centered moving-average window, in genes.
    pub window_size: usize,
    /// Z-score magnitude above which a call is made.
    pub z_score_threshold: f64,
}

impl Default for CnaParams {
    fn default() -> Self {
        CnaParams {
            window_size: DEFAULT_WINDOW_SIZE,
            z_score_threshold: DEFAULT_Z_SCORE_THRESHOLD,
        }
    }
}

/// Run the full pipeline on an in-memory container.
///
/// The container's annotation table is rewritten with the lookup results;
/// the matrix itself is read-only.
pub fn run(
    matrix: &mut ExpressionMatrix,
    transport: &dyn LookupTransport,
    params: &CnaParams,
) -> Result<CnaReport> {
    annotate_genes(matrix, transport)?;
    let (smoothed, order) = smooth_expression(matrix, params.window_size);
    debug!(
        "smoothed {} cells x {} positioned genes (window {})",
        smoothed.nrows(),
        smoothed.ncols(),
        params.window_size
    );
    let (gains, losses) = find_cnas(&smoothed, params.z_score_threshold);
    let report = group_cnas(matrix.annotations(), &order, &gains, &losses);
    debug!(
        "called {} gain blocks and {} loss blocks",
        report.gain_blocks.len(),
        report.loss_blocks.len()
    );
    Ok(report)
}

/// Run the pipeline on a container file, writing the annotated container to
/// `output` before returning the report.
pub fn run_on_file(
    input: &Path,
    output: &Path,
    transport: &dyn LookupTransport,
    params: &CnaParams,
) -> Result<CnaReport> {
    let mut matrix = cna_io::load(input)?;
    let report = run(&mut matrix, transport, params)?;
    cna_io::save(&matrix, output)?;
    Ok(report)
}
