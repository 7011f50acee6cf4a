//! Structured processing log shared by every pipeline stage.
//!
//! Partial success is a first-class state of this pipeline: skipped lines,
//! dropped cells and per-organ computation skips are data, not exceptions.
//! Each stage reports what it dropped as [`LogEvent`] values; the orchestrator
//! stamps them with the owning document id and collects them into one
//! [`ProcessingLog`] per run.

use std::fmt;

use crate::types::{ModelKind, Organ};

/// Severity of a log event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Expected bookkeeping (model choices, collapse notes).
    Info,
    /// Data was dropped or adjusted but processing continued.
    Warning,
    /// A document or computation was aborted.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => f.write_str("INFO"),
            Severity::Warning => f.write_str("WARN"),
            Severity::Error => f.write_str("ERROR"),
        }
    }
}

/// One diagnostic event emitted by a pipeline stage.
#[derive(Clone, Debug, PartialEq)]
pub enum LogEvent {
    /// Lines that matched no recognized pattern and were skipped.
    LinesSkipped {
        /// Number of unrecognized lines in the document.
        count: usize,
    },

    /// An organ dose line appeared before any time marker was declared.
    MarkerMissing {
        /// Source line of the orphaned dose line.
        line: usize,
    },

    /// A recognized cell carried an unparseable numeric value.
    InvalidCell {
        /// Label of the field the value belonged to.
        label: String,
        /// Source line of the cell.
        line: usize,
        /// The raw text that failed to parse.
        raw: String,
    },

    /// A dose cell named an organ the anatomy table does not know.
    UnknownOrgan {
        /// The unrecognized label.
        label: String,
        /// Source line of the cell.
        line: usize,
    },

    /// A duplicate `(organ, time)` pair with identical dose was collapsed.
    DuplicateCollapsed {
        /// Organ whose series contained the duplicate.
        organ: Organ,
        /// Time marker of the collapsed entry, in hours.
        time_h: f64,
    },

    /// A declared organ ended up with no usable data and was omitted.
    OrganOmitted {
        /// Report label of the omitted organ.
        label: String,
    },

    /// The model chosen for one organ's computation.
    ModelSelected {
        /// Organ being assessed.
        organ: Organ,
        /// Model the dose magnitude (or override) selected.
        model: ModelKind,
        /// Organ dose in sievert.
        dose_sv: f64,
    },

    /// A formula produced a negative excess risk that was clamped to zero.
    RiskClamped {
        /// Organ whose result was clamped.
        organ: Organ,
        /// The raw (negative) excess relative risk before clamping.
        raw_err: f64,
    },

    /// Elapsed time since exposure has not reached the model latency.
    LatencyNotReached {
        /// Organ being assessed.
        organ: Organ,
        /// Years elapsed since exposure.
        elapsed_y: f64,
        /// Minimum latency of the site model, in years.
        latency_y: f64,
    },

    /// Elapsed time fell outside every BEIR V leukaemia risk window.
    OutsideRiskWindow {
        /// Organ being assessed.
        organ: Organ,
        /// Years elapsed since exposure.
        elapsed_y: f64,
    },

    /// The organ dose exceeds the domain of applicability of both models.
    DoseOutsideDomain {
        /// Organ being assessed.
        organ: Organ,
        /// Organ dose in sievert.
        dose_sv: f64,
    },

    /// One organ's computation was skipped; the rest of the document proceeded.
    OrganSkipped {
        /// Organ whose computation was skipped.
        organ: Organ,
        /// Reason the computation could not run.
        reason: String,
    },

    /// A whole document's processing was aborted.
    DocumentFailed {
        /// Reason the document could not be processed.
        reason: String,
    },
}

impl LogEvent {
    /// Severity of the event.
    pub fn severity(&self) -> Severity {
        match self {
            LogEvent::LinesSkipped { .. }
            | LogEvent::DuplicateCollapsed { .. }
            | LogEvent::ModelSelected { .. } => Severity::Info,
            LogEvent::MarkerMissing { .. }
            | LogEvent::InvalidCell { .. }
            | LogEvent::UnknownOrgan { .. }
            | LogEvent::OrganOmitted { .. }
            | LogEvent::RiskClamped { .. }
            | LogEvent::LatencyNotReached { .. }
            | LogEvent::OutsideRiskWindow { .. }
            | LogEvent::DoseOutsideDomain { .. }
            | LogEvent::OrganSkipped { .. } => Severity::Warning,
            LogEvent::DocumentFailed { .. } => Severity::Error,
        }
    }
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogEvent::LinesSkipped { count } => {
                write!(f, "{count} unrecognized lines skipped")
            }
            LogEvent::MarkerMissing { line } => {
                write!(f, "dose line {line} precedes any time marker; skipped")
            }
            LogEvent::InvalidCell { label, line, raw } => {
                write!(f, "unparseable value for '{label}' at line {line}: {raw:?}")
            }
            LogEvent::UnknownOrgan { label, line } => {
                write!(f, "unknown organ '{label}' at line {line}; cell skipped")
            }
            LogEvent::DuplicateCollapsed { organ, time_h } => {
                write!(f, "duplicate entry for {organ} at t={time_h} h collapsed")
            }
            LogEvent::OrganOmitted { label } => {
                write!(f, "organ omitted: no usable data for '{label}'")
            }
            LogEvent::ModelSelected {
                organ,
                model,
                dose_sv,
            } => {
                write!(f, "{organ}: {model} selected at {dose_sv:.4e} Sv")
            }
            LogEvent::RiskClamped { organ, raw_err } => {
                write!(f, "{organ}: negative ERR {raw_err:.4e} clamped to zero")
            }
            LogEvent::LatencyNotReached {
                organ,
                elapsed_y,
                latency_y,
            } => {
                write!(
                    f,
                    "{organ}: elapsed {elapsed_y:.1} y below latency {latency_y:.1} y, ERR = 0"
                )
            }
            LogEvent::OutsideRiskWindow { organ, elapsed_y } => {
                write!(
                    f,
                    "{organ}: elapsed {elapsed_y:.1} y outside leukaemia risk windows, ERR = 0"
                )
            }
            LogEvent::DoseOutsideDomain { organ, dose_sv } => {
                write!(
                    f,
                    "{organ}: dose {dose_sv:.4e} Sv outside model domain; computation skipped"
                )
            }
            LogEvent::OrganSkipped { organ, reason } => {
                write!(f, "{organ}: computation skipped: {reason}")
            }
            LogEvent::DocumentFailed { reason } => {
                write!(f, "document failed: {reason}")
            }
        }
    }
}

/// A log event stamped with the document it belongs to.
#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    /// Identifier of the owning document.
    pub document: String,
    /// The event.
    pub event: LogEvent,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.event.severity(),
            self.document,
            self.event
        )
    }
}

/// Accumulated diagnostics for one orchestrator run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProcessingLog {
    entries: Vec<LogEntry>,
}

impl ProcessingLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one event for a document.
    pub fn push(&mut self, document: &str, event: LogEvent) {
        self.entries.push(LogEntry {
            document: document.to_string(),
            event,
        });
    }

    /// Records a batch of events for one document.
    pub fn extend_for(&mut self, document: &str, events: impl IntoIterator<Item = LogEvent>) {
        for event in events {
            self.push(document, event);
        }
    }

    /// Appends all entries of another log.
    pub fn merge(&mut self, other: ProcessingLog) {
        self.entries.extend(other.entries);
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Entries belonging to one document.
    pub fn document_entries<'a>(&'a self, document: &'a str) -> impl Iterator<Item = &'a LogEntry> {
        self.entries.iter().filter(move |e| e.document == document)
    }

    /// Number of entries at or above a severity.
    pub fn count_at_least(&self, severity: Severity) -> usize {
        self.entries
            .iter()
            .filter(|e| e.event.severity() >= severity)
            .count()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for ProcessingLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}
