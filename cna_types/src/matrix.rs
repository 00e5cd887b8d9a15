//! The cells-by-genes expression matrix container.

use crate::annotation::GeneAnnotation;
use anyhow::{ensure, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the raw-counts layer, preferred over the primary matrix when present.
pub const COUNTS_LAYER: &str = "counts";

/// An expression matrix (rows = cells, columns = genes) together with its
/// row/column identifiers, optional named alternate matrices, and a mutable
/// per-gene annotation table.
///
/// The annotation table always has one row per gene, in matrix column order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpressionMatrix {
    cell_names: Vec<String>,
    gene_names: Vec<String>,
    matrix: Array2<f64>,
    layers: BTreeMap<String, Array2<f64>>,
    annotations: Vec<GeneAnnotation>,
}

impl ExpressionMatrix {
    /// Build a container, checking that names agree with the matrix shape.
    pub fn new(
        cell_names: Vec<String>,
        gene_names: Vec<String>,
        matrix: Array2<f64>,
    ) -> Result<Self> {
        let annotations = vec![GeneAnnotation::default(); gene_names.len()];
        let container = ExpressionMatrix {
            cell_names,
            gene_names,
            matrix,
            layers: BTreeMap::new(),
            annotations,
        };
        container.validate()?;
        Ok(container)
    }

    /// Check the container invariants. Used on construction and after
    /// loading from disk, where the file contents are untrusted.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.matrix.nrows() == self.cell_names.len(),
            "matrix has {} rows but {} cell names",
            self.matrix.nrows(),
            self.cell_names.len()
        );
        ensure!(
            self.matrix.ncols() == self.gene_names.len(),
            "matrix has {} columns but {} gene names",
            self.matrix.ncols(),
            self.gene_names.len()
        );
        ensure!(
            self.annotations.len() == self.gene_names.len(),
            "annotation table has {} rows but matrix has {} genes",
            self.annotations.len(),
            self.gene_names.len()
        );
        for (name, layer) in &self.layers {
            ensure!(
                layer.dim() == self.matrix.dim(),
                "layer {name} has shape {:?}, expected {:?}",
                layer.dim(),
                self.matrix.dim()
            );
        }
        Ok(())
    }

    /// Number of cells (matrix rows).
    pub fn n_cells(&self) -> usize {
        self.matrix.nrows()
    }

    /// Number of genes (matrix columns).
    pub fn n_genes(&self) -> usize {
        self.matrix.ncols()
    }

    /// Per-cell identifiers, in row order.
    pub fn cell_names(&self) -> &[String] {
        &self.cell_names
    }

    /// Per-gene labels, in column order.
    pub fn gene_names(&self) -> &[String] {
        &self.gene_names
    }

    /// The primary expression matrix.
    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    /// Add or replace a named layer. Shape must match the primary matrix.
    pub fn insert_layer(&mut self, name: impl Into<String>, layer: Array2<f64>) -> Result<()> {
        let name = name.into();
        ensure!(
            layer.dim() == self.matrix.dim(),
            "layer {name} has shape {:?}, expected {:?}",
            layer.dim(),
            self.matrix.dim()
        );
        self.layers.insert(name, layer);
        Ok(())
    }

    /// A named layer, if present.
    pub fn layer(&self, name: &str) -> Option<&Array2<f64>> {
        self.layers.get(name)
    }

    /// The raw counts layer if present, else the primary matrix.
    pub fn counts(&self) -> &Array2<f64> {
        self.layers.get(COUNTS_LAYER).unwrap_or(&self.matrix)
    }

    /// The gene annotation table, in matrix column order.
    pub fn annotations(&self) -> &[GeneAnnotation] {
        &self.annotations
    }

    /// Replace the gene annotation table. Must keep one row per gene.
    pub fn set_annotations(&mut self, annotations: Vec<GeneAnnotation>) -> Result<()> {
        ensure!(
            annotations.len() == self.gene_names.len(),
            "annotation table has {} rows but matrix has {} genes",
            annotations.len(),
            self.gene_names.len()
        );
        self.annotations = annotations;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::arr2;

    fn names(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{prefix}{i}")).collect()
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let m = arr2(&[[1.0, 2.0], [3.0, 4.0]]);
        assert!(ExpressionMatrix::new(names("c", 3), names("g", 2), m.clone()).is_err());
        assert!(ExpressionMatrix::new(names("c", 2), names("g", 3), m).is_err());
    }

    #[test]
    fn counts_layer_is_preferred() -> Result<()> {
        let mut em =
            ExpressionMatrix::new(names("c", 2), names("g", 2), arr2(&[[1.0, 2.0], [3.0, 4.0]]))?;
        assert_eq!(em.counts(), em.matrix());
        let raw = arr2(&[[10.0, 20.0], [30.0, 40.0]]);
        em.insert_layer(COUNTS_LAYER, raw.clone())?;
        assert_eq!(em.counts(), &raw);
        Ok(())
    }

    #[test]
    fn layer_shape_mismatch_is_rejected() -> Result<()> {
        let mut em =
            ExpressionMatrix::new(names("c", 2), names("g", 2), arr2(&[[1.0, 2.0], [3.0, 4.0]]))?;
        assert!(em.insert_layer("bad", arr2(&[[1.0, 2.0]])).is_err());
        Ok(())
    }

    #[test]
    fn annotation_table_keeps_one_row_per_gene() -> Result<()> {
        let mut em =
            ExpressionMatrix::new(names("c", 2), names("g", 2), arr2(&[[1.0, 2.0], [3.0, 4.0]]))?;
        assert_eq!(em.annotations().len(), 2);
        assert!(em.set_annotations(vec![GeneAnnotation::default()]).is_err());
        Ok(())
    }
}
