//! Error types for parameter tables and model evaluation.

use dosim_core::types::{CancerSite, ModelKind, Sex};
use thiserror::Error;

/// Parameter-table errors.
///
/// Load-time validation surfaces missing or malformed coefficient records
/// before any computation runs; the only parameter error that can still occur
/// at compute time is a sex-specific lookup against a site that does not
/// apply to that sex.
#[derive(Debug, Error)]
pub enum ParameterError {
    /// The table carries no record for a required cancer site.
    #[error("parameter set is missing site '{site}'")]
    MissingSite {
        /// The absent site.
        site: CancerSite,
    },

    /// A parameter file keyed a record by a label no site matches.
    #[error("unknown cancer site label '{label}' in parameter file")]
    UnknownSite {
        /// The unmatched label.
        label: String,
    },

    /// No coefficient exists for this organ/sex/model combination.
    #[error("no {model} coefficient for {site} / {sex}")]
    UnsupportedCombination {
        /// Site of the failed lookup.
        site: CancerSite,
        /// Sex of the failed lookup.
        sex: Sex,
        /// Model the lookup was for.
        model: ModelKind,
    },

    /// A coefficient value is outside its admissible range.
    #[error("invalid coefficient {name} = {value} for site '{site}'")]
    InvalidCoefficient {
        /// Site carrying the bad value.
        site: CancerSite,
        /// Name of the coefficient.
        name: String,
        /// The offending value.
        value: f64,
    },

    /// A site record is internally inconsistent.
    #[error("inconsistent record for site '{site}': {detail}")]
    Inconsistent {
        /// Site carrying the inconsistency.
        site: CancerSite,
        /// What does not line up.
        detail: String,
    },

    /// The parameter file could not be parsed.
    #[error("failed to parse parameter file: {0}")]
    Parse(#[from] serde_json::Error),
}
