//! Line-oriented extraction of dose observations from HotSpot reports.

use std::collections::VecDeque;

use regex::Regex;

use dosim_core::types::{Organ, RawDoseObservation};
use dosim_core::LogEvent;

use crate::error::ExtractionError;
use crate::number::parse_number;

/// Compiled line patterns for one report dialect.
///
/// The report structure is fixed: header fields as `Label : value` pairs,
/// dose blocks opened by a time marker, organ doses as dotted bracket cells.
struct LinePatterns {
    nuclide: Regex,
    marker: Regex,
    organ_cell: Regex,
}

impl LinePatterns {
    fn new() -> Self {
        Self {
            nuclide: Regex::new(r"(?i)^\s*Source Material\s*:\s*(\S+)").unwrap(),
            marker: Regex::new(
                r"(?i)^\s*(?:Time After Release|Integration Time)\s*:\s*(\S+)\s*(minute|min|hour|hr|day)s?\b",
            )
            .unwrap(),
            organ_cell: Regex::new(r"([A-Za-z][A-Za-z ]*?)\s*\.{2,}\s*\[([^\]]*)\]").unwrap(),
        }
    }
}

/// Extractor for HotSpot plain-text reports.
///
/// Stateless apart from its compiled patterns; one instance can extract any
/// number of documents.
pub struct HotspotExtractor {
    patterns: LinePatterns,
}

impl HotspotExtractor {
    /// Creates an extractor with the standard report patterns.
    pub fn new() -> Self {
        Self {
            patterns: LinePatterns::new(),
        }
    }

    /// Returns a lazy observation stream over one document.
    ///
    /// The stream is finite and non-restartable: it walks the document lines
    /// once, yielding observations as dose cells are recognized. Skip counts
    /// and per-value diagnostics accumulate on the stream and can be read
    /// after it is exhausted.
    pub fn observations<'a>(&'a self, text: &'a str) -> Observations<'a> {
        Observations {
            patterns: &self.patterns,
            lines: text.lines().enumerate(),
            nuclide: None,
            marker_h: None,
            queued: VecDeque::new(),
            skipped_lines: 0,
            dropped_cells: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Extracts a whole document eagerly.
    ///
    /// # Errors
    ///
    /// [`ExtractionError::NoUsableData`] when the document yields zero
    /// observations; the error carries the diagnostics gathered on the way.
    pub fn extract_document(&self, text: &str) -> Result<DocumentExtract, ExtractionError> {
        let mut stream = self.observations(text);
        let observations: Vec<RawDoseObservation> = stream.by_ref().collect();

        if observations.is_empty() {
            return Err(ExtractionError::NoUsableData {
                skipped_lines: stream.skipped_lines,
                dropped_cells: stream.dropped_cells,
                diagnostics: stream.diagnostics,
            });
        }

        Ok(DocumentExtract {
            nuclide: stream.nuclide,
            observations,
            skipped_lines: stream.skipped_lines,
            dropped_cells: stream.dropped_cells,
            diagnostics: stream.diagnostics,
        })
    }
}

impl Default for HotspotExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of eagerly extracting one document.
#[derive(Clone, Debug)]
pub struct DocumentExtract {
    /// Released nuclide from the report header, when stated.
    pub nuclide: Option<String>,
    /// All observations, in document order.
    pub observations: Vec<RawDoseObservation>,
    /// Lines that matched no recognized pattern.
    pub skipped_lines: usize,
    /// Recognized cells dropped by per-value filtering.
    pub dropped_cells: usize,
    /// Per-value diagnostics for the processing log.
    pub diagnostics: Vec<LogEvent>,
}

/// Lazy observation stream over one document.
///
/// Yields [`RawDoseObservation`] values in document order; see
/// [`HotspotExtractor::observations`].
pub struct Observations<'a> {
    patterns: &'a LinePatterns,
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    nuclide: Option<String>,
    marker_h: Option<f64>,
    queued: VecDeque<RawDoseObservation>,
    skipped_lines: usize,
    dropped_cells: usize,
    diagnostics: Vec<LogEvent>,
}

impl Observations<'_> {
    /// Lines skipped so far.
    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }

    /// Cells dropped by per-value filtering so far.
    pub fn dropped_cells(&self) -> usize {
        self.dropped_cells
    }

    /// Diagnostics accumulated so far.
    pub fn diagnostics(&self) -> &[LogEvent] {
        &self.diagnostics
    }

    /// The nuclide seen in the header, once the header has been passed.
    pub fn nuclide(&self) -> Option<&str> {
        self.nuclide.as_deref()
    }

    fn scan_line(&mut self, line_no: usize, line: &str) {
        if let Some(caps) = self.patterns.marker.captures(line) {
            let raw = &caps[1];
            match parse_number(raw) {
                Some(value) if value >= 0.0 => {
                    self.marker_h = Some(value * unit_factor_h(&caps[2]));
                }
                _ => {
                    // A bad marker invalidates the block: attributing the
                    // following cells to the previous marker would be wrong.
                    self.marker_h = None;
                    self.diagnostics.push(LogEvent::InvalidCell {
                        label: "time marker".to_string(),
                        line: line_no,
                        raw: raw.to_string(),
                    });
                }
            }
            return;
        }

        let cells: Vec<(String, String)> = self
            .patterns
            .organ_cell
            .captures_iter(line)
            .map(|caps| (caps[1].trim().to_string(), caps[2].to_string()))
            .collect();

        if !cells.is_empty() {
            let Some(time_h) = self.marker_h else {
                self.dropped_cells += cells.len();
                self.diagnostics.push(LogEvent::MarkerMissing { line: line_no });
                return;
            };

            for (label, raw_value) in cells {
                let Some(organ) = Organ::from_label(&label) else {
                    self.dropped_cells += 1;
                    self.diagnostics.push(LogEvent::UnknownOrgan {
                        label,
                        line: line_no,
                    });
                    continue;
                };
                let Some(dose_sv) = parse_number(&raw_value) else {
                    self.dropped_cells += 1;
                    self.diagnostics.push(LogEvent::InvalidCell {
                        label,
                        line: line_no,
                        raw: raw_value,
                    });
                    continue;
                };
                self.queued.push_back(RawDoseObservation {
                    nuclide: self.nuclide.clone(),
                    organ,
                    time_h,
                    dose_sv,
                    line: line_no,
                });
            }
            return;
        }

        if let Some(caps) = self.patterns.nuclide.captures(line) {
            if self.nuclide.is_none() {
                self.nuclide = Some(caps[1].to_string());
            }
            return;
        }

        if !line.trim().is_empty() {
            self.skipped_lines += 1;
        }
    }
}

impl Iterator for Observations<'_> {
    type Item = RawDoseObservation;

    fn next(&mut self) -> Option<RawDoseObservation> {
        loop {
            if let Some(obs) = self.queued.pop_front() {
                return Some(obs);
            }
            let (idx, line) = self.lines.next()?;
            self.scan_line(idx + 1, line);
        }
    }
}

fn unit_factor_h(unit: &str) -> f64 {
    let unit = unit.to_ascii_lowercase();
    if unit.starts_with("min") {
        1.0 / 60.0
    } else if unit.starts_with('d') {
        24.0
    } else {
        1.0
    }
}
