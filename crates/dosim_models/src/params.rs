//! Model parameter tables.
//!
//! One [`SiteParams`] record per cancer site, holding the BEIR VII
//! coefficients, the BEIR V model definition and the sex-specific lifetime
//! baseline incidence used for the lifetime-attributable-risk projection.
//!
//! The built-in table transcribes the published committee estimates:
//! BEIR VII phase 2 Table 12-2 (ERR incidence models) and the BEIR V (1990)
//! committee models with their time-window coefficients. A table can also be
//! loaded from a JSON file in the same shape; either way it is validated
//! exhaustively before first use, so a missing organ/sex/model combination is
//! a startup failure, not a compute-time surprise.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use dosim_core::types::CancerSite;
use dosim_core::Sex;

use crate::error::ParameterError;

/// A per-sex pair of optional coefficients.
///
/// Several sites apply to one sex only (breast, ovary and uterus to females,
/// prostate to males); the absent side is `None` and a lookup against it is a
/// [`ParameterError::UnsupportedCombination`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SexPair {
    /// Coefficient for males, when the site applies.
    #[serde(default)]
    pub male: Option<f64>,
    /// Coefficient for females, when the site applies.
    #[serde(default)]
    pub female: Option<f64>,
}

impl SexPair {
    /// Same coefficient for both sexes.
    pub fn both(value: f64) -> Self {
        Self {
            male: Some(value),
            female: Some(value),
        }
    }

    /// Distinct coefficients per sex.
    pub fn split(male: f64, female: f64) -> Self {
        Self {
            male: Some(male),
            female: Some(female),
        }
    }

    /// Male-only coefficient.
    pub fn male_only(value: f64) -> Self {
        Self {
            male: Some(value),
            female: None,
        }
    }

    /// Female-only coefficient.
    pub fn female_only(value: f64) -> Self {
        Self {
            male: None,
            female: Some(value),
        }
    }

    /// Looks up the coefficient for a sex.
    pub fn for_sex(&self, sex: Sex) -> Option<f64> {
        match sex {
            Sex::Male => self.male,
            Sex::Female => self.female,
        }
    }

    fn values(&self) -> impl Iterator<Item = f64> {
        self.male.into_iter().chain(self.female)
    }
}

/// BEIR VII coefficients for a solid-cancer site.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolidViiParams {
    /// ERR per sievert at the reference ages, per sex.
    pub beta: SexPair,
    /// Exponential modifier per decade of exposure age below 30.
    pub gamma: f64,
    /// Power of attained age over 60.
    pub eta: f64,
    /// Dose and dose-rate effectiveness factor.
    pub ddref: f64,
    /// Minimum latency in years before any excess risk is expressed.
    pub latency_y: f64,
}

/// BEIR VII coefficients for the leukaemia model.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeukemiaViiParams {
    /// ERR per sievert, per sex.
    pub beta: SexPair,
    /// Exposure-age modifier per decade below 30.
    pub gamma: f64,
    /// Time-since-exposure log modifier.
    pub delta: f64,
    /// Interaction of exposure age and time since exposure.
    pub phi: f64,
    /// Curvature of the linear-quadratic dose response, per sievert.
    pub theta: f64,
    /// Minimum latency in years.
    pub latency_y: f64,
}

/// The BEIR VII model attached to a site.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model_type", rename_all = "snake_case")]
pub enum BeirViiModel {
    /// Solid-cancer ERR model.
    Solid(SolidViiParams),
    /// Leukaemia linear-quadratic ERR model.
    Leukemia(LeukemiaViiParams),
}

/// One years-since-exposure window of the BEIR V leukaemia model.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Inclusive upper bound on years since exposure.
    pub max_years_since: f64,
    /// Exponential coefficient applied inside the window.
    pub beta: f64,
}

/// A block of time windows applying up to an exposure age.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExposureBlock {
    /// Inclusive upper bound on age at exposure for this block.
    pub max_exposure_age: f64,
    /// Windows in ascending order; elapsed time beyond the last window means
    /// no excess risk.
    pub windows: Vec<TimeWindow>,
}

/// One exposure-age bracket of the BEIR V breast model.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgeBracket {
    /// Exclusive upper bound on age at exposure.
    pub max_age: f64,
    /// Linear ERR coefficient per sievert inside the bracket.
    pub coef: f64,
}

/// The BEIR V model attached to a site.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model_type", rename_all = "snake_case")]
pub enum BeirVModel {
    /// Leukaemia linear-quadratic model with time windows.
    LeukemiaLinearQuadratic {
        /// Linear dose coefficient, per sievert.
        alpha2: f64,
        /// Quadratic dose coefficient, per sievert squared.
        alpha3: f64,
        /// Exposure-age blocks, ascending in `max_exposure_age`.
        blocks: Vec<ExposureBlock>,
    },
    /// Female-breast model with exposure-age brackets.
    BreastAgeDependent {
        /// Brackets in ascending `max_age` order.
        brackets: Vec<AgeBracket>,
        /// Coefficient beyond the last bracket.
        default_coef: f64,
    },
    /// Thyroid model with a childhood sensitivity threshold.
    ThyroidAgeDependent {
        /// Exposure age below which the childhood coefficient applies.
        threshold_age: f64,
        /// Coefficient for childhood exposure.
        coef_young: f64,
        /// Coefficient for adult exposure.
        coef_adult: f64,
    },
    /// Simple linear model with sex-specific coefficient.
    Linear {
        /// ERR per sievert, per sex.
        coef: SexPair,
    },
}

/// Complete coefficient record for one cancer site.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SiteParams {
    /// BEIR VII model and coefficients.
    pub beir_vii: BeirViiModel,
    /// BEIR V model and coefficients.
    pub beir_v: BeirVModel,
    /// Lifetime baseline incidence per sex, as a fraction.
    pub baseline_incidence: SexPair,
}

#[derive(Deserialize)]
struct ParameterFile {
    configurations: BTreeMap<String, SiteParams>,
}

/// The read-only model parameter set.
///
/// Loaded once at startup (built-in table or JSON file) and shared immutably
/// by every computation; no interior mutability, no locking.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterSet {
    sites: BTreeMap<CancerSite, SiteParams>,
}

impl ParameterSet {
    /// Returns the built-in table of published committee estimates.
    ///
    /// The table always validates; the debug assertion guards against edits
    /// to the constants below.
    pub fn builtin() -> Self {
        let set = Self {
            sites: builtin_sites(),
        };
        debug_assert!(set.validate().is_ok());
        set
    }

    /// Loads and validates a parameter set from JSON text.
    ///
    /// The file shape mirrors the in-memory layout: a `configurations` object
    /// keyed by site label, each value a [`SiteParams`] record.
    ///
    /// # Errors
    ///
    /// [`ParameterError::Parse`] on malformed JSON,
    /// [`ParameterError::UnknownSite`] for an unrecognized site label, and
    /// any validation error for incomplete or out-of-range coefficients.
    pub fn from_json(text: &str) -> Result<Self, ParameterError> {
        let file: ParameterFile = serde_json::from_str(text)?;

        let mut sites = BTreeMap::new();
        for (label, params) in file.configurations {
            let site = CancerSite::from_label(&label)
                .ok_or(ParameterError::UnknownSite { label })?;
            sites.insert(site, params);
        }

        let set = Self { sites };
        set.validate()?;
        Ok(set)
    }

    /// Returns the record for a site.
    ///
    /// # Errors
    ///
    /// [`ParameterError::MissingSite`] if the table has no record; cannot
    /// occur on a validated set.
    pub fn site(&self, site: CancerSite) -> Result<&SiteParams, ParameterError> {
        self.sites
            .get(&site)
            .ok_or(ParameterError::MissingSite { site })
    }

    /// Validates the whole table.
    ///
    /// Checks that every site of [`CancerSite::ALL`] is present, that all
    /// coefficients are finite and within their admissible ranges, and that
    /// each site record is internally consistent (a sex with an ERR
    /// coefficient must also have a baseline incidence).
    pub fn validate(&self) -> Result<(), ParameterError> {
        for site in CancerSite::ALL {
            let params = self.site(site)?;
            validate_site(site, params)?;
        }
        Ok(())
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self::builtin()
    }
}

fn check_finite(site: CancerSite, name: &str, value: f64) -> Result<(), ParameterError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ParameterError::InvalidCoefficient {
            site,
            name: name.to_string(),
            value,
        })
    }
}

fn check_fraction(site: CancerSite, name: &str, value: f64) -> Result<(), ParameterError> {
    check_finite(site, name, value)?;
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ParameterError::InvalidCoefficient {
            site,
            name: name.to_string(),
            value,
        })
    }
}

fn validate_site(site: CancerSite, params: &SiteParams) -> Result<(), ParameterError> {
    let beta = match &params.beir_vii {
        BeirViiModel::Solid(p) => {
            for value in p.beta.values() {
                check_finite(site, "beta", value)?;
            }
            check_finite(site, "gamma", p.gamma)?;
            check_finite(site, "eta", p.eta)?;
            check_finite(site, "ddref", p.ddref)?;
            if p.ddref <= 0.0 {
                return Err(ParameterError::InvalidCoefficient {
                    site,
                    name: "ddref".to_string(),
                    value: p.ddref,
                });
            }
            if p.latency_y < 0.0 || !p.latency_y.is_finite() {
                return Err(ParameterError::InvalidCoefficient {
                    site,
                    name: "latency_y".to_string(),
                    value: p.latency_y,
                });
            }
            p.beta
        }
        BeirViiModel::Leukemia(p) => {
            for value in p.beta.values() {
                check_finite(site, "beta", value)?;
            }
            for (name, value) in [
                ("gamma", p.gamma),
                ("delta", p.delta),
                ("phi", p.phi),
                ("theta", p.theta),
            ] {
                check_finite(site, name, value)?;
            }
            if p.latency_y < 0.0 || !p.latency_y.is_finite() {
                return Err(ParameterError::InvalidCoefficient {
                    site,
                    name: "latency_y".to_string(),
                    value: p.latency_y,
                });
            }
            p.beta
        }
    };

    if beta.male.is_none() && beta.female.is_none() {
        return Err(ParameterError::Inconsistent {
            site,
            detail: "no BEIR VII coefficient for either sex".to_string(),
        });
    }

    match &params.beir_v {
        BeirVModel::LeukemiaLinearQuadratic {
            alpha2,
            alpha3,
            blocks,
        } => {
            check_finite(site, "alpha2", *alpha2)?;
            check_finite(site, "alpha3", *alpha3)?;
            if *alpha2 < 0.0 || *alpha3 < 0.0 {
                return Err(ParameterError::Inconsistent {
                    site,
                    detail: "negative linear-quadratic dose coefficient".to_string(),
                });
            }
            if blocks.is_empty() {
                return Err(ParameterError::Inconsistent {
                    site,
                    detail: "leukaemia model without exposure-age blocks".to_string(),
                });
            }
            for block in blocks {
                check_finite(site, "max_exposure_age", block.max_exposure_age)?;
                if block.windows.is_empty() {
                    return Err(ParameterError::Inconsistent {
                        site,
                        detail: "exposure-age block without time windows".to_string(),
                    });
                }
                for pair in block.windows.windows(2) {
                    if pair[0].max_years_since >= pair[1].max_years_since {
                        return Err(ParameterError::Inconsistent {
                            site,
                            detail: "time windows not strictly ascending".to_string(),
                        });
                    }
                }
                for window in &block.windows {
                    check_finite(site, "max_years_since", window.max_years_since)?;
                    check_finite(site, "window beta", window.beta)?;
                }
            }
        }
        BeirVModel::BreastAgeDependent {
            brackets,
            default_coef,
        } => {
            check_finite(site, "default_coef", *default_coef)?;
            for pair in brackets.windows(2) {
                if pair[0].max_age >= pair[1].max_age {
                    return Err(ParameterError::Inconsistent {
                        site,
                        detail: "age brackets not strictly ascending".to_string(),
                    });
                }
            }
            for bracket in brackets {
                check_finite(site, "bracket max_age", bracket.max_age)?;
                check_finite(site, "bracket coef", bracket.coef)?;
            }
        }
        BeirVModel::ThyroidAgeDependent {
            threshold_age,
            coef_young,
            coef_adult,
        } => {
            check_finite(site, "threshold_age", *threshold_age)?;
            check_finite(site, "coef_young", *coef_young)?;
            check_finite(site, "coef_adult", *coef_adult)?;
        }
        BeirVModel::Linear { coef } => {
            for value in coef.values() {
                check_finite(site, "coef", value)?;
            }
            if coef.male.is_none() && coef.female.is_none() {
                return Err(ParameterError::Inconsistent {
                    site,
                    detail: "no BEIR V coefficient for either sex".to_string(),
                });
            }
        }
    }

    for (sex, baseline) in [
        (Sex::Male, params.baseline_incidence.male),
        (Sex::Female, params.baseline_incidence.female),
    ] {
        if let Some(value) = baseline {
            check_fraction(site, "baseline_incidence", value)?;
        }
        if beta.for_sex(sex).is_some() && baseline.is_none() {
            return Err(ParameterError::Inconsistent {
                site,
                detail: format!("ERR coefficient for {sex} without baseline incidence"),
            });
        }
    }

    Ok(())
}

const SOLID_GAMMA: f64 = -0.30;
const SOLID_ETA: f64 = -1.4;
const SOLID_DDREF: f64 = 1.5;
const SOLID_LATENCY_Y: f64 = 5.0;

fn solid(beta: SexPair) -> BeirViiModel {
    BeirViiModel::Solid(SolidViiParams {
        beta,
        gamma: SOLID_GAMMA,
        eta: SOLID_ETA,
        ddref: SOLID_DDREF,
        latency_y: SOLID_LATENCY_Y,
    })
}

fn linear(coef: SexPair) -> BeirVModel {
    BeirVModel::Linear { coef }
}

fn builtin_sites() -> BTreeMap<CancerSite, SiteParams> {
    // BEIR V committee linear coefficients: the digestive model folds the
    // female modifier exp(0.553) into the female coefficient.
    let digestive = linear(SexPair::split(0.809, 1.407));

    let mut sites = BTreeMap::new();

    sites.insert(
        CancerSite::Stomach,
        SiteParams {
            beir_vii: solid(SexPair::split(0.21, 0.48)),
            beir_v: digestive.clone(),
            baseline_incidence: SexPair::split(0.010, 0.007),
        },
    );
    sites.insert(
        CancerSite::Colon,
        SiteParams {
            beir_vii: solid(SexPair::split(0.63, 0.43)),
            beir_v: digestive.clone(),
            baseline_incidence: SexPair::split(0.042, 0.042),
        },
    );
    sites.insert(
        CancerSite::Liver,
        SiteParams {
            beir_vii: solid(SexPair::split(0.32, 0.32)),
            beir_v: digestive,
            baseline_incidence: SexPair::split(0.010, 0.004),
        },
    );
    sites.insert(
        CancerSite::Lung,
        SiteParams {
            beir_vii: solid(SexPair::split(0.32, 1.40)),
            // BEIR V respiratory model, central estimate.
            beir_v: linear(SexPair::both(0.636)),
            baseline_incidence: SexPair::split(0.077, 0.062),
        },
    );
    sites.insert(
        CancerSite::Breast,
        SiteParams {
            // BEIR VII breast uses its own age dependence: no exposure-age
            // modifier, attained-age power -2.
            beir_vii: BeirViiModel::Solid(SolidViiParams {
                beta: SexPair::female_only(0.51),
                gamma: 0.0,
                eta: -2.0,
                ddref: SOLID_DDREF,
                latency_y: SOLID_LATENCY_Y,
            }),
            beir_v: BeirVModel::BreastAgeDependent {
                brackets: vec![
                    AgeBracket {
                        max_age: 15.0,
                        coef: 1.20,
                    },
                    AgeBracket {
                        max_age: 25.0,
                        coef: 0.60,
                    },
                    AgeBracket {
                        max_age: 35.0,
                        coef: 0.40,
                    },
                ],
                default_coef: 0.20,
            },
            baseline_incidence: SexPair::female_only(0.124),
        },
    );
    sites.insert(
        CancerSite::Prostate,
        SiteParams {
            beir_vii: solid(SexPair::male_only(0.12)),
            beir_v: linear(SexPair::male_only(1.220)),
            baseline_incidence: SexPair::male_only(0.159),
        },
    );
    sites.insert(
        CancerSite::Uterus,
        SiteParams {
            beir_vii: solid(SexPair::female_only(0.055)),
            beir_v: linear(SexPair::female_only(1.220)),
            baseline_incidence: SexPair::female_only(0.026),
        },
    );
    sites.insert(
        CancerSite::Ovary,
        SiteParams {
            beir_vii: solid(SexPair::female_only(0.38)),
            beir_v: linear(SexPair::female_only(1.220)),
            baseline_incidence: SexPair::female_only(0.015),
        },
    );
    sites.insert(
        CancerSite::Bladder,
        SiteParams {
            beir_vii: solid(SexPair::split(0.50, 1.65)),
            beir_v: linear(SexPair::both(1.220)),
            baseline_incidence: SexPair::split(0.034, 0.011),
        },
    );
    sites.insert(
        CancerSite::Thyroid,
        SiteParams {
            // Thyroid carries its own age modifiers in BEIR VII.
            beir_vii: BeirViiModel::Solid(SolidViiParams {
                beta: SexPair::split(0.53, 1.05),
                gamma: -0.83,
                eta: 0.0,
                ddref: SOLID_DDREF,
                latency_y: SOLID_LATENCY_Y,
            }),
            beir_v: BeirVModel::ThyroidAgeDependent {
                threshold_age: 18.0,
                coef_young: 7.5,
                coef_adult: 0.5,
            },
            baseline_incidence: SexPair::split(0.005, 0.012),
        },
    );
    sites.insert(
        CancerSite::Leukemia,
        SiteParams {
            beir_vii: BeirViiModel::Leukemia(LeukemiaViiParams {
                beta: SexPair::split(1.1, 1.2),
                gamma: -0.40,
                delta: -0.48,
                phi: 0.42,
                theta: 0.87,
                latency_y: 2.0,
            }),
            beir_v: BeirVModel::LeukemiaLinearQuadratic {
                alpha2: 0.243,
                alpha3: 0.271,
                blocks: vec![
                    ExposureBlock {
                        max_exposure_age: 20.0,
                        windows: vec![
                            TimeWindow {
                                max_years_since: 15.0,
                                beta: 4.885,
                            },
                            TimeWindow {
                                max_years_since: 25.0,
                                beta: 2.380,
                            },
                        ],
                    },
                    ExposureBlock {
                        max_exposure_age: 999.0,
                        windows: vec![
                            TimeWindow {
                                max_years_since: 25.0,
                                beta: 2.367,
                            },
                            TimeWindow {
                                max_years_since: 30.0,
                                beta: 1.638,
                            },
                        ],
                    },
                ],
            },
            baseline_incidence: SexPair::split(0.016, 0.011),
        },
    );
    sites.insert(
        CancerSite::OtherSolid,
        SiteParams {
            beir_vii: solid(SexPair::split(0.27, 0.45)),
            beir_v: linear(SexPair::both(1.220)),
            baseline_incidence: SexPair::split(0.045, 0.041),
        },
    );

    sites
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_exhaustive_and_valid() {
        let set = ParameterSet::builtin();
        assert!(set.validate().is_ok());
        for site in CancerSite::ALL {
            assert!(set.site(site).is_ok(), "missing {site}");
        }
    }

    #[test]
    fn test_sex_specific_sites() {
        let set = ParameterSet::builtin();

        let breast = set.site(CancerSite::Breast).unwrap();
        let BeirViiModel::Solid(p) = breast.beir_vii else {
            panic!("breast must be a solid site");
        };
        assert_eq!(p.beta.for_sex(Sex::Male), None);
        assert_eq!(p.beta.for_sex(Sex::Female), Some(0.51));

        let prostate = set.site(CancerSite::Prostate).unwrap();
        let BeirViiModel::Solid(p) = prostate.beir_vii else {
            panic!("prostate must be a solid site");
        };
        assert_eq!(p.beta.for_sex(Sex::Female), None);
    }

    #[test]
    fn test_leukemia_uses_lq_models_on_both_reports() {
        let set = ParameterSet::builtin();
        let leukemia = set.site(CancerSite::Leukemia).unwrap();
        assert!(matches!(leukemia.beir_vii, BeirViiModel::Leukemia(_)));
        assert!(matches!(
            leukemia.beir_v,
            BeirVModel::LeukemiaLinearQuadratic { .. }
        ));
    }

    #[test]
    fn test_from_json_round_trip_of_one_site() {
        let json = r#"{
            "configurations": {
                "lung": {
                    "beir_vii": {
                        "model_type": "solid",
                        "beta": {"male": 0.32, "female": 1.40},
                        "gamma": -0.30,
                        "eta": -1.4,
                        "ddref": 1.5,
                        "latency_y": 5.0
                    },
                    "beir_v": {
                        "model_type": "linear",
                        "coef": {"male": 0.636, "female": 0.636}
                    },
                    "baseline_incidence": {"male": 0.077, "female": 0.062}
                }
            }
        }"#;

        // A single site fails exhaustiveness validation.
        let err = ParameterSet::from_json(json).unwrap_err();
        assert!(matches!(err, ParameterError::MissingSite { .. }));
    }

    #[test]
    fn test_from_json_full_builtin_round_trip() {
        let set = ParameterSet::builtin();
        let configurations: BTreeMap<String, &SiteParams> = CancerSite::ALL
            .iter()
            .map(|&site| (site.label().to_string(), set.site(site).unwrap()))
            .collect();
        let json = serde_json::json!({ "configurations": configurations }).to_string();

        let reloaded = ParameterSet::from_json(&json).unwrap();
        assert_eq!(reloaded, set);
    }

    #[test]
    fn test_from_json_unknown_site_rejected() {
        let json = r#"{"configurations": {"plutonium": {
            "beir_vii": {"model_type": "solid", "beta": {"male": 0.1},
                         "gamma": 0.0, "eta": 0.0, "ddref": 1.5, "latency_y": 5.0},
            "beir_v": {"model_type": "linear", "coef": {"male": 0.1}},
            "baseline_incidence": {"male": 0.01}
        }}}"#;
        let err = ParameterSet::from_json(json).unwrap_err();
        assert!(matches!(err, ParameterError::UnknownSite { label } if label == "plutonium"));
    }

    #[test]
    fn test_validation_rejects_non_finite_coefficient() {
        let mut set = ParameterSet::builtin();
        let lung = set.sites.get_mut(&CancerSite::Lung).unwrap();
        if let BeirViiModel::Solid(p) = &mut lung.beir_vii {
            p.gamma = f64::NAN;
        }
        assert!(matches!(
            set.validate().unwrap_err(),
            ParameterError::InvalidCoefficient { site: CancerSite::Lung, .. }
        ));
    }

    #[test]
    fn test_validation_rejects_missing_baseline_for_covered_sex() {
        let mut set = ParameterSet::builtin();
        let lung = set.sites.get_mut(&CancerSite::Lung).unwrap();
        lung.baseline_incidence.female = None;
        assert!(matches!(
            set.validate().unwrap_err(),
            ParameterError::Inconsistent { site: CancerSite::Lung, .. }
        ));
    }

    #[test]
    fn test_validation_rejects_missing_site() {
        let mut set = ParameterSet::builtin();
        set.sites.remove(&CancerSite::Thyroid);
        assert!(matches!(
            set.validate().unwrap_err(),
            ParameterError::MissingSite {
                site: CancerSite::Thyroid
            }
        ));
    }
}
