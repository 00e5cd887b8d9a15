//! Shared data model for the expression-based CNA screening pipeline.
#![deny(missing_docs)]

pub mod annotation;
pub mod events;
pub mod matrix;

pub use annotation::{GeneAnnotation, GenomicSpan};
pub use events::{CnaBlock, CnaEvent, CnaLabel, CnaReport};
pub use matrix::{ExpressionMatrix, COUNTS_LAYER};
