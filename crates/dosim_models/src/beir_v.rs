//! BEIR V (1990) committee models.
//!
//! Unlike BEIR VII there is no unified master equation: the committee defined
//! distinct model shapes per site group. The leukaemia model is
//! linear-quadratic in dose with an exponential coefficient selected from
//! exposure-age blocks and years-since-exposure windows; breast and thyroid
//! use exposure-age dependent linear coefficients; the remaining sites are
//! plain linear in dose with sex-specific slopes.
//!
//! Boundary semantics follow the published tables: time-window upper bounds
//! are inclusive (`t ≤ 15` stays in the first window), age brackets are
//! exclusive (`e < 18` counts as childhood exposure).

use dosim_core::types::{CancerSite, ModelKind, Sex};

use crate::error::ParameterError;
use crate::params::{BeirVModel, ExposureBlock};

/// Outcome of a BEIR V evaluation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum BeirVErr {
    /// The computed excess relative risk.
    Value(f64),
    /// Elapsed time fell outside every leukaemia risk window; the model
    /// assigns no excess risk.
    OutsideWindow,
}

impl BeirVErr {
    /// The numeric ERR, treating an exceeded window as zero.
    pub fn value_or_zero(&self) -> f64 {
        match self {
            BeirVErr::Value(v) => *v,
            BeirVErr::OutsideWindow => 0.0,
        }
    }
}

/// Resolves the leukaemia time-window coefficient.
///
/// The first block whose `max_exposure_age` bound admits the exposure age is
/// selected (inclusive); within it, the first window whose `max_years_since`
/// bound admits the elapsed time (inclusive). `None` means the elapsed time
/// exceeded every window of the applicable block.
pub fn window_beta(blocks: &[ExposureBlock], exposure_age: f64, elapsed_y: f64) -> Option<f64> {
    let block = blocks
        .iter()
        .find(|block| exposure_age <= block.max_exposure_age)?;
    block
        .windows
        .iter()
        .find(|window| elapsed_y <= window.max_years_since)
        .map(|window| window.beta)
}

/// Evaluates a site's BEIR V model.
///
/// `elapsed_y` (years since exposure) drives the leukaemia window selection;
/// the other model shapes ignore it.
///
/// # Errors
///
/// `ParameterError::UnsupportedCombination` when the model carries no
/// coefficient for the requested sex (breast for males, and the single-sex
/// linear sites).
pub fn excess_relative_risk(
    model: &BeirVModel,
    site: CancerSite,
    sex: Sex,
    dose_sv: f64,
    exposure_age: f64,
    elapsed_y: f64,
) -> Result<BeirVErr, ParameterError> {
    let unsupported = || ParameterError::UnsupportedCombination {
        site,
        sex,
        model: ModelKind::BeirV,
    };

    match model {
        BeirVModel::LeukemiaLinearQuadratic {
            alpha2,
            alpha3,
            blocks,
        } => match window_beta(blocks, exposure_age, elapsed_y) {
            Some(beta) => {
                let quadratic = alpha2 * dose_sv + alpha3 * dose_sv * dose_sv;
                Ok(BeirVErr::Value(quadratic * beta.exp()))
            }
            None => Ok(BeirVErr::OutsideWindow),
        },
        BeirVModel::BreastAgeDependent {
            brackets,
            default_coef,
        } => {
            if sex != Sex::Female {
                return Err(unsupported());
            }
            let coef = brackets
                .iter()
                .find(|bracket| exposure_age < bracket.max_age)
                .map(|bracket| bracket.coef)
                .unwrap_or(*default_coef);
            Ok(BeirVErr::Value(coef * dose_sv))
        }
        BeirVModel::ThyroidAgeDependent {
            threshold_age,
            coef_young,
            coef_adult,
        } => {
            let coef = if exposure_age < *threshold_age {
                *coef_young
            } else {
                *coef_adult
            };
            Ok(BeirVErr::Value(coef * dose_sv))
        }
        BeirVModel::Linear { coef } => {
            let coef = coef.for_sex(sex).ok_or_else(unsupported)?;
            Ok(BeirVErr::Value(coef * dose_sv))
        }
    }
}
