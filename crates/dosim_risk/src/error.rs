//! Error types for risk calculation and pipeline orchestration.

use adapter_hotspot::ExtractionError;
use dosim_core::types::Organ;
use dosim_core::ReshapeError;
use dosim_models::ParameterError;
use thiserror::Error;

/// Invalid assessment inputs.
///
/// All variants are fatal for the computation they scope: a bad age pair
/// fails the whole document, a negative organ dose fails that organ.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    /// Age at assessment precedes age at exposure.
    #[error("age at assessment {assessment_age} precedes age at exposure {exposure_age}")]
    AgeOrder {
        /// Age at exposure in years.
        exposure_age: f64,
        /// Age at assessment in years.
        assessment_age: f64,
    },

    /// A negative or non-finite age was supplied.
    #[error("invalid age: {value}")]
    InvalidAge {
        /// The offending value.
        value: f64,
    },

    /// An organ dose was negative.
    #[error("negative dose for {organ}: {dose_sv} Sv")]
    NegativeDose {
        /// Organ carrying the negative dose.
        organ: Organ,
        /// The offending dose in sievert.
        dose_sv: f64,
    },
}

/// Errors scoped to one organ's risk computation.
///
/// Other organs of the same document still compute; the orchestrator records
/// the skipped organ with its reason.
#[derive(Debug, Error)]
pub enum RiskError {
    /// Invalid input values.
    #[error(transparent)]
    Input(#[from] InputError),

    /// Missing or unusable model coefficients.
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    /// The organ dose exceeds the models' domain of applicability.
    #[error("dose {dose_sv:.4e} Sv for {organ} exceeds the model domain cap")]
    OutsideDomain {
        /// Organ being assessed.
        organ: Organ,
        /// The out-of-domain dose in sievert.
        dose_sv: f64,
    },
}

/// Errors scoped to a whole document.
///
/// One document's failure never aborts the batch: the orchestrator records
/// the failure and proceeds with the remaining documents.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The document yielded no usable dose data.
    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    /// The document's observations were ambiguous.
    #[error("reshape failed: {0}")]
    Reshape(#[from] ReshapeError),

    /// The assessment parameters were invalid.
    #[error(transparent)]
    Input(#[from] InputError),

    /// A reassessment referenced a document without a cached dose table.
    #[error("no cached dose table for document '{document}'")]
    NotCached {
        /// The unknown document id.
        document: String,
    },
}
