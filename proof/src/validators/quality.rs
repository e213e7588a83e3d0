//! Quality validator: document length within the configured bounds.

use crate::config::Thresholds;

/// Outcome of the quality check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityVerdict {
    /// Length in Unicode code points.
    pub length: usize,
    /// Inclusive lower bound used.
    pub min_length: usize,
    /// Inclusive upper bound used.
    pub max_length: usize,
    /// True iff `min_length <= length <= max_length`.
    pub passed: bool,
}

/// Measures `text` and checks it against `thresholds`.
pub fn validate(text: &str, thresholds: &Thresholds) -> QualityVerdict {
    let length = text.chars().count();
    QualityVerdict {
        length,
        min_length: thresholds.min_length,
        max_length: thresholds.max_length,
        passed: (thresholds.min_length..=thresholds.max_length).contains(&length),
    }
}
