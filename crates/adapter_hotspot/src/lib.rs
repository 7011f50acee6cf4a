//! # adapter_hotspot: Simulation Report Extraction
//!
//! ## Adapter Layer Role
//!
//! Parses the plain-text dispersion reports produced by the HotSpot
//! simulation tool into streams of [`dosim_core::RawDoseObservation`].
//!
//! The reports are line-oriented: a free-form header (stack geometry,
//! meteorology, source term), followed by dose blocks. Each block opens with
//! a time marker (`Time After Release : 24,00 hours`) and lists organ doses
//! as dotted bracket cells (`Thyroid.............[5.00E-02]`). Numeric values
//! may use either `.` or `,` as the decimal separator depending on the locale
//! the simulation ran under.
//!
//! Recognition is per-cell and failure is per-value: an unparseable number or
//! an unknown organ label drops that cell with a diagnostic while the rest of
//! the line is still used. Only a document yielding zero observations is
//! fatal.
//!
//! ```
//! use adapter_hotspot::HotspotExtractor;
//!
//! let report = "\
//! Source Material           : I-131
//! Time After Release        : 24,00 hours
//! Thyroid.......................[5.00E-02]
//! ";
//!
//! let extractor = HotspotExtractor::new();
//! let extract = extractor.extract_document(report).unwrap();
//! assert_eq!(extract.observations.len(), 1);
//! assert_eq!(extract.nuclide.as_deref(), Some("I-131"));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod error;
pub mod number;
pub mod parser;

pub use error::ExtractionError;
pub use parser::{DocumentExtract, HotspotExtractor, Observations};
