//! Export functionality for analysis and research
//!
//! This module provides functionality to export training data in various formats.
//! Currently supports CSV export of the episode-length learning curve.

mod curve_csv;

pub use curve_csv::{CurveRecord, write_length_curve, write_length_curve_to};
