//! Per-organ risk assessment.
//!
//! The calculator combines a dose-table entry with the assessment ages and
//! sex, picks the model by dose magnitude (or honours a forced override),
//! evaluates the site's formula and projects the lifetime attributable risk
//! against the sex-specific baseline incidence.
//!
//! Excess risk values are never negative: the formulas are biological risk
//! models, and a negative intermediate (possible from the exposure-age and
//! attained-age modifiers at extreme ages) is clamped to zero with a
//! diagnostic.

use std::sync::Arc;

use dosim_core::types::{ModelKind, Organ, Sex};
use dosim_core::{DoseTable, LogEvent};
use dosim_models::{
    beir_v, BeirVErr, BeirViiModel, LeukemiaSiteModel, ParameterSet, SolidSiteModel,
};
use dosim_models::{select_model, within_model_domain};

use crate::error::{InputError, RiskError};
use crate::report::{RiskReport, RiskResult, SkippedOrgan};

/// Validated assessment parameters shared by a run.
///
/// Constructed through [`AssessmentParams::new`], which enforces the input
/// contract once: ages are finite and non-negative, and the assessment age
/// does not precede the exposure age.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AssessmentParams {
    exposure_age: f64,
    assessment_age: f64,
    sex: Sex,
    model_override: Option<ModelKind>,
}

impl AssessmentParams {
    /// Creates validated parameters.
    ///
    /// # Errors
    ///
    /// [`InputError::InvalidAge`] for a negative or non-finite age,
    /// [`InputError::AgeOrder`] when the assessment age precedes the
    /// exposure age.
    pub fn new(exposure_age: f64, assessment_age: f64, sex: Sex) -> Result<Self, InputError> {
        for value in [exposure_age, assessment_age] {
            if !value.is_finite() || value < 0.0 {
                return Err(InputError::InvalidAge { value });
            }
        }
        if assessment_age < exposure_age {
            return Err(InputError::AgeOrder {
                exposure_age,
                assessment_age,
            });
        }
        Ok(Self {
            exposure_age,
            assessment_age,
            sex,
            model_override: None,
        })
    }

    /// Pins every computation of the run to one model, bypassing the
    /// dose-magnitude selection rule.
    pub fn with_model_override(mut self, model: ModelKind) -> Self {
        self.model_override = Some(model);
        self
    }

    /// Age at exposure in years.
    pub fn exposure_age(&self) -> f64 {
        self.exposure_age
    }

    /// Age at assessment in years.
    pub fn assessment_age(&self) -> f64 {
        self.assessment_age
    }

    /// Sex of the assessed individual.
    pub fn sex(&self) -> Sex {
        self.sex
    }

    /// The forced model, if any.
    pub fn model_override(&self) -> Option<ModelKind> {
        self.model_override
    }

    /// Years elapsed between exposure and assessment.
    pub fn elapsed_y(&self) -> f64 {
        self.assessment_age - self.exposure_age
    }
}

/// The value object one organ computation runs on.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RiskInput {
    /// Organ dose in sievert.
    pub dose_sv: f64,
    /// Age at exposure in years.
    pub exposure_age: f64,
    /// Age at assessment in years.
    pub assessment_age: f64,
    /// Sex of the assessed individual.
    pub sex: Sex,
}

impl RiskInput {
    /// Builds the input for one organ from shared parameters and its dose.
    pub fn from_params(params: &AssessmentParams, dose_sv: f64) -> Self {
        Self {
            dose_sv,
            exposure_age: params.exposure_age(),
            assessment_age: params.assessment_age(),
            sex: params.sex(),
        }
    }
}

/// Applies the epidemiological models to dose-table entries.
///
/// Holds the shared read-only parameter set; cheap to clone and safe to use
/// from multiple threads.
#[derive(Clone, Debug)]
pub struct RiskCalculator {
    params: Arc<ParameterSet>,
}

impl RiskCalculator {
    /// Creates a calculator over a loaded parameter set.
    pub fn new(params: Arc<ParameterSet>) -> Self {
        Self { params }
    }

    /// The parameter set computations run against.
    pub fn parameter_set(&self) -> &ParameterSet {
        &self.params
    }

    /// Assesses one organ.
    ///
    /// Appends model-selection and zero-risk diagnostics to `notes`.
    ///
    /// # Errors
    ///
    /// [`RiskError::Input`] for a negative dose or inverted ages,
    /// [`RiskError::OutsideDomain`] for a dose beyond the model cap, and
    /// [`RiskError::Parameter`] when no coefficient exists for the
    /// organ/sex/model combination. All are fatal for this organ only.
    pub fn assess_organ(
        &self,
        organ: Organ,
        input: &RiskInput,
        model_override: Option<ModelKind>,
        notes: &mut Vec<LogEvent>,
    ) -> Result<RiskResult, RiskError> {
        let RiskInput {
            dose_sv,
            exposure_age,
            assessment_age,
            sex,
        } = *input;

        for value in [exposure_age, assessment_age] {
            if !value.is_finite() || value < 0.0 {
                return Err(InputError::InvalidAge { value }.into());
            }
        }
        if assessment_age < exposure_age {
            return Err(InputError::AgeOrder {
                exposure_age,
                assessment_age,
            }
            .into());
        }
        if dose_sv < 0.0 {
            return Err(InputError::NegativeDose { organ, dose_sv }.into());
        }
        if !within_model_domain(dose_sv) {
            return Err(RiskError::OutsideDomain { organ, dose_sv });
        }

        let model = model_override.unwrap_or_else(|| select_model(dose_sv));
        notes.push(LogEvent::ModelSelected {
            organ,
            model,
            dose_sv,
        });

        let site = organ.site();
        let site_params = self.params.site(site)?;
        let elapsed_y = assessment_age - exposure_age;

        let raw_err = match model {
            ModelKind::BeirVii => match &site_params.beir_vii {
                BeirViiModel::Solid(p) => {
                    let site_model = SolidSiteModel::<f64>::from_params(p, site, sex)?;
                    if elapsed_y < site_model.latency_y() {
                        notes.push(LogEvent::LatencyNotReached {
                            organ,
                            elapsed_y,
                            latency_y: site_model.latency_y(),
                        });
                        0.0
                    } else {
                        site_model.err(dose_sv, exposure_age, assessment_age)
                    }
                }
                BeirViiModel::Leukemia(p) => {
                    let site_model = LeukemiaSiteModel::<f64>::from_params(p, site, sex)?;
                    if elapsed_y < site_model.latency_y() {
                        notes.push(LogEvent::LatencyNotReached {
                            organ,
                            elapsed_y,
                            latency_y: site_model.latency_y(),
                        });
                        0.0
                    } else {
                        site_model.err(dose_sv, exposure_age, assessment_age)
                    }
                }
            },
            ModelKind::BeirV => {
                match beir_v::excess_relative_risk(
                    &site_params.beir_v,
                    site,
                    sex,
                    dose_sv,
                    exposure_age,
                    elapsed_y,
                )? {
                    BeirVErr::Value(value) => value,
                    BeirVErr::OutsideWindow => {
                        notes.push(LogEvent::OutsideRiskWindow { organ, elapsed_y });
                        0.0
                    }
                }
            }
        };

        let err = if raw_err < 0.0 {
            notes.push(LogEvent::RiskClamped { organ, raw_err });
            0.0
        } else {
            raw_err
        };

        let baseline = site_params.baseline_incidence.for_sex(sex).ok_or(
            dosim_models::ParameterError::UnsupportedCombination { site, sex, model },
        )?;

        Ok(RiskResult {
            organ,
            site,
            model,
            dose_sv,
            err,
            lar: err * baseline,
        })
    }

    /// Assesses every organ of a dose table into a report.
    ///
    /// Per-organ failures do not abort the table: the failed organ is listed
    /// as skipped with its reason, recorded in `notes`, and the remaining
    /// organs still compute. The report total is the sum of the per-organ
    /// lifetime attributable risk contributions.
    pub fn assess_table(
        &self,
        document: &str,
        table: &DoseTable,
        params: &AssessmentParams,
        notes: &mut Vec<LogEvent>,
    ) -> RiskReport {
        let mut results = Vec::new();
        let mut skipped = Vec::new();

        for organ in table.organs() {
            let Some(dose_sv) = table.committed_dose(organ) else {
                continue;
            };
            let input = RiskInput::from_params(params, dose_sv);
            match self.assess_organ(organ, &input, params.model_override(), notes) {
                Ok(result) => results.push(result),
                Err(err) => {
                    if let RiskError::OutsideDomain { organ, dose_sv } = &err {
                        notes.push(LogEvent::DoseOutsideDomain {
                            organ: *organ,
                            dose_sv: *dose_sv,
                        });
                    } else {
                        notes.push(LogEvent::OrganSkipped {
                            organ,
                            reason: err.to_string(),
                        });
                    }
                    skipped.push(SkippedOrgan {
                        organ,
                        reason: err.to_string(),
                    });
                }
            }
        }

        let total_lar = results.iter().map(|r| r.lar).sum();
        RiskReport {
            document: document.to_string(),
            exposure_age: params.exposure_age(),
            assessment_age: params.assessment_age(),
            sex: params.sex(),
            results,
            skipped,
            total_lar,
        }
    }
}
