//! Document validators.
//!
//! Each validator is a pure function of the document text and the configured
//! thresholds. None depends on another's output, so they may run in any order.

pub mod authenticity;
pub mod quality;
pub mod uniqueness;
