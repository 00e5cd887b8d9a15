//! Positional smoothing, z-score CNA detection, and event grouping.
#![deny(missing_docs)]

mod detect;
mod group;
mod smooth;

pub use detect::{find_cnas, DEFAULT_Z_SCORE_THRESHOLD};
pub use group::group_cnas;
pub use smooth::{smooth_expression, DEFAULT_WINDOW_SIZE};
