//! # dosim_models: Epidemiological Risk Models
//!
//! ## Layer 2 (Business Logic) Role
//!
//! This crate provides:
//! - The model parameter set: one coefficient record per cancer site,
//!   validated exhaustively at load time (`params`)
//! - The BEIR VII phase-2 excess relative risk formulas (`beir_vii`)
//! - The BEIR V (1990) committee models with their piecewise time-window
//!   definitions (`beir_v`)
//! - The dose-magnitude model-selection rule and domain cap (`selection`)
//!
//! ## Design Principles
//!
//! - **Enum-keyed parameter lookup**: coefficients are keyed by
//!   [`dosim_core::CancerSite`], not strings; a missing combination surfaces
//!   at load time, not at compute time.
//! - **Generic closed-form models** over `num_traits::Float` for the
//!   BEIR VII formulas; the table-driven BEIR V models are concrete `f64`.
//! - **Read-only sharing**: a loaded [`ParameterSet`] is immutable and can be
//!   shared across threads without locking.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod beir_v;
pub mod beir_vii;
pub mod error;
pub mod params;
pub mod selection;

pub use beir_v::{excess_relative_risk, window_beta, BeirVErr};
pub use beir_vii::{exposure_age_normalization, LeukemiaSiteModel, SolidSiteModel};
pub use error::ParameterError;
pub use params::{
    AgeBracket, BeirVModel, BeirViiModel, ExposureBlock, LeukemiaViiParams, ParameterSet,
    SexPair, SiteParams, SolidViiParams, TimeWindow,
};
pub use selection::{select_model, within_model_domain, HIGH_DOSE_THRESHOLD_SV, MODEL_DOMAIN_CAP_SV};
