//! BEIR VII phase-2 excess relative risk models.
//!
//! The committee's preferred ERR formulation for low-dose, low-LET exposure.
//!
//! ## Mathematical Formulas
//!
//! **Solid cancers**: ERR(D, e, a) = β·D·exp(γ·e*)·(a/60)^η / DDREF
//!
//! **Leukaemia**: ERR(D, e, a) = β·D·(1 + θD)·exp(γ·e* + δ·ln(t/25) + ϕ·e*·ln(t/25))
//!
//! Where:
//! - e* = (e − 30)/10 for exposure age e < 30, and 0 for e ≥ 30
//! - a is attained age, t = a − e is time since exposure
//! - leukaemia's dose-response curvature θ replaces the DDREF reduction

use num_traits::Float;

use dosim_core::types::{CancerSite, ModelKind, Sex};

use crate::error::ParameterError;
use crate::params::{LeukemiaViiParams, SolidViiParams};

/// Computes the centred exposure-age variable e*.
///
/// The committee centres exposure age at 30 and scales per decade; exposures
/// at 30 or later carry no exposure-age penalty.
///
/// # Examples
/// ```
/// use dosim_models::exposure_age_normalization;
///
/// assert_eq!(exposure_age_normalization(30.0_f64), 0.0);
/// assert_eq!(exposure_age_normalization(40.0_f64), 0.0);
/// assert_eq!(exposure_age_normalization(20.0_f64), -1.0);
/// ```
#[inline]
pub fn exposure_age_normalization<T: Float>(exposure_age: T) -> T {
    let thirty = T::from(30.0).unwrap();
    let ten = T::from(10.0).unwrap();

    if exposure_age < thirty {
        (exposure_age - thirty) / ten
    } else {
        T::zero()
    }
}

/// BEIR VII solid-cancer ERR model for one site and sex.
///
/// # Type Parameters
/// * `T` - Floating-point type implementing `Float` (e.g., `f64`, `f32`)
///
/// # Examples
/// ```
/// use dosim_core::types::{CancerSite, Sex};
/// use dosim_models::{ParameterSet, BeirViiModel, SolidSiteModel};
///
/// let set = ParameterSet::builtin();
/// let BeirViiModel::Solid(params) = set.site(CancerSite::Thyroid).unwrap().beir_vii else {
///     unreachable!();
/// };
/// let model =
///     SolidSiteModel::<f64>::from_params(&params, CancerSite::Thyroid, Sex::Female).unwrap();
///
/// // Exposure at 30, assessed at 60: both age modifiers are unity.
/// let err = model.err(0.05, 30.0, 60.0);
/// assert!((err - 1.05 * 0.05 / 1.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct SolidSiteModel<T: Float> {
    beta: T,
    gamma: T,
    eta: T,
    ddref: T,
    latency_y: T,
}

impl<T: Float> SolidSiteModel<T> {
    /// Builds the model for one sex from a site's coefficient record.
    ///
    /// # Errors
    /// `ParameterError::UnsupportedCombination` when the site carries no
    /// coefficient for the requested sex.
    pub fn from_params(
        params: &SolidViiParams,
        site: CancerSite,
        sex: Sex,
    ) -> Result<Self, ParameterError> {
        let beta = params
            .beta
            .for_sex(sex)
            .ok_or(ParameterError::UnsupportedCombination {
                site,
                sex,
                model: ModelKind::BeirVii,
            })?;

        Ok(Self {
            beta: T::from(beta).unwrap(),
            gamma: T::from(params.gamma).unwrap(),
            eta: T::from(params.eta).unwrap(),
            ddref: T::from(params.ddref).unwrap(),
            latency_y: T::from(params.latency_y).unwrap(),
        })
    }

    /// Minimum latency in years before the site expresses excess risk.
    #[inline]
    pub fn latency_y(&self) -> T {
        self.latency_y
    }

    /// Computes the excess relative risk.
    ///
    /// ERR = β·D·exp(γ·e*)·(a/60)^η / DDREF
    ///
    /// The caller is responsible for the latency gate (ERR is defined as zero
    /// while `a − e < latency`).
    #[inline]
    pub fn err(&self, dose_sv: T, exposure_age: T, attained_age: T) -> T {
        let sixty = T::from(60.0).unwrap();
        let e_star = exposure_age_normalization(exposure_age);

        let exposure_term = (self.gamma * e_star).exp();
        let attained_term = (attained_age / sixty).powf(self.eta);

        self.beta * dose_sv * exposure_term * attained_term / self.ddref
    }
}

/// BEIR VII leukaemia ERR model for one sex.
///
/// Linear-quadratic in dose; the time dependence enters through
/// `ln(t/25)` rather than an attained-age power.
#[derive(Debug, Clone)]
pub struct LeukemiaSiteModel<T: Float> {
    beta: T,
    gamma: T,
    delta: T,
    phi: T,
    theta: T,
    latency_y: T,
}

impl<T: Float> LeukemiaSiteModel<T> {
    /// Builds the model for one sex from the leukaemia coefficient record.
    ///
    /// # Errors
    /// `ParameterError::UnsupportedCombination` when no coefficient exists
    /// for the requested sex.
    pub fn from_params(
        params: &LeukemiaViiParams,
        site: CancerSite,
        sex: Sex,
    ) -> Result<Self, ParameterError> {
        let beta = params
            .beta
            .for_sex(sex)
            .ok_or(ParameterError::UnsupportedCombination {
                site,
                sex,
                model: ModelKind::BeirVii,
            })?;

        Ok(Self {
            beta: T::from(beta).unwrap(),
            gamma: T::from(params.gamma).unwrap(),
            delta: T::from(params.delta).unwrap(),
            phi: T::from(params.phi).unwrap(),
            theta: T::from(params.theta).unwrap(),
            latency_y: T::from(params.latency_y).unwrap(),
        })
    }

    /// Minimum latency in years.
    #[inline]
    pub fn latency_y(&self) -> T {
        self.latency_y
    }

    /// Computes the excess relative risk.
    ///
    /// ERR = β·D·(1 + θD)·exp(γ·e* + δ·ln(t/25) + ϕ·e*·ln(t/25))
    ///
    /// The caller must have passed the latency gate, which also guarantees
    /// t > 0 for the logarithm.
    #[inline]
    pub fn err(&self, dose_sv: T, exposure_age: T, attained_age: T) -> T {
        let twenty_five = T::from(25.0).unwrap();
        let e_star = exposure_age_normalization(exposure_age);
        let elapsed = attained_age - exposure_age;

        let log_t = (elapsed / twenty_five).ln();
        let exponent = self.gamma * e_star + self.delta * log_t + self.phi * e_star * log_t;

        self.beta * dose_sv * (T::one() + self.theta * dose_sv) * exponent.exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{ParameterSet, BeirViiModel};
    use approx::assert_relative_eq;

    fn solid_params(site: CancerSite) -> SolidViiParams {
        let set = ParameterSet::builtin();
        match set.site(site).unwrap().beir_vii {
            BeirViiModel::Solid(p) => p,
            BeirViiModel::Leukemia(_) => panic!("expected solid site"),
        }
    }

    fn leukemia_params() -> LeukemiaViiParams {
        let set = ParameterSet::builtin();
        match set.site(CancerSite::Leukemia).unwrap().beir_vii {
            BeirViiModel::Leukemia(p) => p,
            BeirViiModel::Solid(_) => panic!("expected leukaemia site"),
        }
    }

    // ==========================================================
    // e* centring
    // ==========================================================

    #[test]
    fn test_e_star_below_thirty() {
        assert_relative_eq!(exposure_age_normalization(10.0_f64), -2.0);
        assert_relative_eq!(exposure_age_normalization(25.0_f64), -0.5);
    }

    #[test]
    fn test_e_star_at_and_above_thirty() {
        assert_eq!(exposure_age_normalization(30.0_f64), 0.0);
        assert_eq!(exposure_age_normalization(55.0_f64), 0.0);
    }

    // ==========================================================
    // Solid model
    // ==========================================================

    #[test]
    fn test_solid_reference_ages_reduce_to_beta_over_ddref() {
        // At e = 30 and a = 60 both age modifiers are unity, so
        // ERR = beta * D / DDREF regardless of gamma and eta.
        let params = solid_params(CancerSite::Stomach);
        let model =
            SolidSiteModel::<f64>::from_params(&params, CancerSite::Stomach, Sex::Female).unwrap();

        let err = model.err(0.05, 30.0, 60.0);
        assert_relative_eq!(err, 0.48 * 0.05 / 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_solid_young_exposure_raises_risk() {
        // gamma is negative and e* is negative below 30, so exp(gamma*e*) > 1.
        let params = solid_params(CancerSite::Lung);
        let model =
            SolidSiteModel::<f64>::from_params(&params, CancerSite::Lung, Sex::Male).unwrap();

        let young = model.err(0.05, 10.0, 60.0);
        let reference = model.err(0.05, 30.0, 60.0);
        assert!(young > reference);
    }

    #[test]
    fn test_solid_err_linear_in_dose() {
        let params = solid_params(CancerSite::Colon);
        let model =
            SolidSiteModel::<f64>::from_params(&params, CancerSite::Colon, Sex::Male).unwrap();

        let e1 = model.err(0.01, 20.0, 50.0);
        let e2 = model.err(0.02, 20.0, 50.0);
        assert_relative_eq!(e2, 2.0 * e1, epsilon = 1e-12);
    }

    #[test]
    fn test_solid_missing_sex_is_parameter_error() {
        let params = solid_params(CancerSite::Breast);
        let err = SolidSiteModel::<f64>::from_params(&params, CancerSite::Breast, Sex::Male)
            .unwrap_err();
        assert!(matches!(
            err,
            ParameterError::UnsupportedCombination {
                site: CancerSite::Breast,
                sex: Sex::Male,
                model: ModelKind::BeirVii,
            }
        ));
    }

    #[test]
    fn test_solid_f32_compatibility() {
        let params = solid_params(CancerSite::Thyroid);
        let model =
            SolidSiteModel::<f32>::from_params(&params, CancerSite::Thyroid, Sex::Female).unwrap();
        let err = model.err(0.05_f32, 30.0, 60.0);
        assert!((err - 1.05 * 0.05 / 1.5).abs() < 1e-6);
    }

    // ==========================================================
    // Leukaemia model
    // ==========================================================

    #[test]
    fn test_leukemia_at_t25_exponent_depends_only_on_e_star() {
        // At t = 25 the log terms vanish; at e >= 30 also e* = 0, so
        // ERR = beta * D * (1 + theta * D).
        let params = leukemia_params();
        let model =
            LeukemiaSiteModel::<f64>::from_params(&params, CancerSite::Leukemia, Sex::Male)
                .unwrap();

        let dose = 0.05;
        let err = model.err(dose, 30.0, 55.0);
        assert_relative_eq!(err, 1.1 * dose * (1.0 + 0.87 * dose), epsilon = 1e-12);
    }

    #[test]
    fn test_leukemia_quadratic_term_grows_with_dose() {
        let params = leukemia_params();
        let model =
            LeukemiaSiteModel::<f64>::from_params(&params, CancerSite::Leukemia, Sex::Female)
                .unwrap();

        // ERR / D increases with dose because of the (1 + theta D) curvature.
        let low = model.err(0.01, 30.0, 55.0) / 0.01;
        let high = model.err(0.09, 30.0, 55.0) / 0.09;
        assert!(high > low);
    }

    #[test]
    fn test_leukemia_latency() {
        let params = leukemia_params();
        let model =
            LeukemiaSiteModel::<f64>::from_params(&params, CancerSite::Leukemia, Sex::Male)
                .unwrap();
        assert_relative_eq!(model.latency_y(), 2.0);
    }
}
