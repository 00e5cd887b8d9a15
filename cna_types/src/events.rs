//! CNA call records and contiguous blocks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a copy-number call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CnaLabel {
    /// Copy-number gain (z-score above threshold).
    Gain,
    /// Copy-number loss (z-score below negative threshold).
    Loss,
}

impl fmt::Display for CnaLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CnaLabel::Gain => f.write_str("gain"),
            CnaLabel::Loss => f.write_str("loss"),
        }
    }
}

/// One called (cell, gene) pair with the gene's genomic coordinates.
///
/// `gene` is the column index into the original annotation table, not the
/// position-sorted subset the call matrices are laid out in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CnaEvent {
    /// Cell (matrix row) index.
    pub cell: usize,
    /// Gene (original matrix column) index.
    pub gene: usize,
    /// Chromosome of the called gene.
    pub chrom: String,
    /// Gene start coordinate.
    pub start: i64,
    /// Gene end coordinate.
    pub end: i64,
    /// Call direction.
    pub label: CnaLabel,
}

/// A run of same-direction events for one cell on one chromosome whose
/// genomic intervals abut with no gap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CnaBlock {
    /// Member events, in (cell, chrom, start) order. Never empty.
    pub events: Vec<CnaEvent>,
}

impl CnaBlock {
    /// Number of events in the block.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if the block holds no events. Grouping never produces one.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Cell index shared by all member events.
    pub fn cell(&self) -> Option<usize> {
        self.events.first().map(|e| e.cell)
    }

    /// Chromosome shared by all member events.
    pub fn chrom(&self) -> Option<&str> {
        self.events.first().map(|e| e.chrom.as_str())
    }

    /// Start of the first interval in the block.
    pub fn start(&self) -> Option<i64> {
        self.events.first().map(|e| e.start)
    }

    /// End of the last interval in the block.
    pub fn end(&self) -> Option<i64> {
        self.events.last().map(|e| e.end)
    }
}

/// Terminal pipeline output: grouped blocks plus the flat event tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CnaReport {
    /// Contiguous gain blocks.
    pub gain_blocks: Vec<CnaBlock>,
    /// Contiguous loss blocks.
    pub loss_blocks: Vec<CnaBlock>,
    /// Flat gain events, in flatten order.
    pub gain_events: Vec<CnaEvent>,
    /// Flat loss events, in flatten order.
    pub loss_events: Vec<CnaEvent>,
}
