//! # dosim_risk: Risk Calculation and Pipeline Orchestration
//!
//! ## Layer 3 (Application) Role
//!
//! This crate provides:
//! - [`RiskCalculator`]: applies the BEIR V / BEIR VII models to one organ's
//!   dose, with the dose-magnitude selection rule and non-negativity clamp
//! - [`RiskReport`] and the canonical CSV rendering (`report`)
//! - [`PipelineOrchestrator`]: Extractor → Transposer → RiskCalculator over
//!   one or more documents, with per-document failure isolation, a dose-table
//!   cache for reassessment, and optional Rayon batch parallelism
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            dosim_risk (L3)              │
//! ├─────────────────────────────────────────┤
//! │  calculator/ - per-organ assessment     │
//! │  report/     - RiskResult, CSV output   │
//! │  orchestrator/ - batch pipeline, cache  │
//! └─────────────────────────────────────────┘
//!          ↓                    ↓
//! ┌──────────────────┐ ┌──────────────────┐
//! │ adapter_hotspot  │ │   dosim_models   │
//! │ report parsing   │ │ BEIR V/VII maths │
//! └──────────────────┘ └──────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use dosim_core::{ProcessingLog, Sex};
//! use dosim_models::ParameterSet;
//! use dosim_risk::{AssessmentParams, Document, PipelineOrchestrator};
//!
//! let report_text = "\
//! Source Material           : I-131
//! Time After Release        : 24,00 hours
//! Thyroid.......................[5.00E-02]
//! ";
//!
//! let mut orchestrator = PipelineOrchestrator::new(Arc::new(ParameterSet::builtin()));
//! let params = AssessmentParams::new(30.0, 60.0, Sex::Female).unwrap();
//! let mut log = ProcessingLog::new();
//!
//! let document = Document::new("upload-1", report_text);
//! let report = orchestrator
//!     .process_document(&document, &params, &mut log)
//!     .unwrap();
//!
//! assert_eq!(report.results.len(), 1);
//! assert!(report.total_lar > 0.0);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod calculator;
pub mod error;
pub mod orchestrator;
pub mod report;

pub use calculator::{AssessmentParams, RiskCalculator, RiskInput};
pub use error::{InputError, PipelineError, RiskError};
pub use orchestrator::{BatchResult, Document, DocumentOutcome, PipelineOrchestrator};
pub use report::{write_csv, RiskReport, RiskResult, SkippedOrgan};
