//! Per-gene genomic annotations.

use serde::{Deserialize, Serialize};

/// A fully resolved genomic location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenomicSpan {
    /// Chromosome name, as reported by the annotation source.
    pub chrom: String,
    /// Start coordinate (1-based, inclusive).
    pub start: i64,
    /// End coordinate (1-based, inclusive).
    pub end: i64,
}

/// One row of the gene annotation table, ordered to match the matrix columns.
///
/// Every field is optional: a gene whose label could not be parsed has no
/// `gene_id`, and a gene the lookup service had no record for keeps its id
/// but no coordinates. A gene without a `chrom` is excluded from smoothing
/// and detection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneAnnotation {
    /// Resolved gene identifier, if the label was parseable.
    pub gene_id: Option<String>,
    /// Chromosome name, if resolved.
    pub chrom: Option<String>,
    /// Start coordinate, if resolved.
    pub start: Option<i64>,
    /// End coordinate, if resolved.
    pub end: Option<i64>,
}

impl GeneAnnotation {
    /// An annotation with an identifier but no coordinates.
    pub fn unresolved(gene_id: Option<String>) -> Self {
        GeneAnnotation {
            gene_id,
            ..Default::default()
        }
    }

    /// True if chrom, start and end are all present.
    pub fn is_resolved(&self) -> bool {
        self.chrom.is_some() && self.start.is_some() && self.end.is_some()
    }

    /// The genomic location, if fully resolved.
    pub fn span(&self) -> Option<GenomicSpan> {
        Some(GenomicSpan {
            chrom: self.chrom.clone()?,
            start: self.start?,
            end: self.end?,
        })
    }
}
