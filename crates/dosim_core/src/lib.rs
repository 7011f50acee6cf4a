//! # dosim_core: Foundation Types for Dose-to-Risk Conversion
//!
//! ## Layer 1 (Foundation) Role
//!
//! dosim_core is the bottom layer of the dose2risk workspace, providing:
//! - Anatomy and cancer-site vocabulary: `Organ`, `CancerSite` (`types::organ`)
//! - Demographic and model enums: `Sex`, `ModelKind` (`types::sex`, `types::model`)
//! - Raw extraction records: `RawDoseObservation` (`types::observation`)
//! - The per-organ, time-ordered dose table and its transposition (`table`)
//! - Structured processing-log entries shared by every pipeline stage (`log`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other dosim_* crates, with minimal external
//! dependencies:
//! - thiserror: structured error types
//! - serde: serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use dosim_core::table::DoseTable;
//! use dosim_core::types::{Organ, RawDoseObservation};
//!
//! let obs = vec![RawDoseObservation {
//!     nuclide: Some("I-131".to_string()),
//!     organ: Organ::Thyroid,
//!     time_h: 24.0,
//!     dose_sv: 5.0e-2,
//!     line: 12,
//! }];
//!
//! let (table, notes) = DoseTable::from_observations(obs).unwrap();
//! assert!(notes.is_empty());
//! assert_eq!(table.committed_dose(Organ::Thyroid), Some(5.0e-2));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod log;
pub mod table;
pub mod types;

pub use log::{LogEntry, LogEvent, ProcessingLog, Severity};
pub use table::{CollapsedDuplicate, DoseEntry, DoseTable, ReshapeError};
pub use types::{CancerSite, ModelKind, Organ, RawDoseObservation, Sex};
