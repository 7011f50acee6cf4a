//! Shared vocabulary types for the dose-to-risk pipeline.
//!
//! This module provides:
//! - `Organ`, `CancerSite`: anatomy labels and the epidemiological sites they map to
//! - `Sex`: demographic selector for coefficient lookup
//! - `ModelKind`: which published risk model produced a result
//! - `RawDoseObservation`: one extracted dose value with provenance

pub mod model;
pub mod observation;
pub mod organ;
pub mod sex;

pub use model::ModelKind;
pub use observation::RawDoseObservation;
pub use organ::{CancerSite, Organ};
pub use sex::Sex;
