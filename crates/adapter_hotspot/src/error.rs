//! Error types for report extraction.

use dosim_core::LogEvent;
use thiserror::Error;

/// Fatal extraction failures.
///
/// Per-value problems (bad cells, unknown labels) are diagnostics, not
/// errors; extraction only fails outright when a whole document contributes
/// nothing usable.
#[derive(Debug, Clone, Error)]
pub enum ExtractionError {
    /// The document produced no usable dose observations at all.
    #[error("no usable dose data: {skipped_lines} unrecognized lines, {dropped_cells} dropped cells")]
    NoUsableData {
        /// Number of unrecognized lines in the document.
        skipped_lines: usize,
        /// Number of recognized cells dropped by per-value filtering.
        dropped_cells: usize,
        /// The per-value diagnostics gathered before giving up.
        diagnostics: Vec<LogEvent>,
    },
}
