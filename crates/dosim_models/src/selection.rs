//! Dose-magnitude model selection.
//!
//! The hybrid rule of the pipeline: below 100 mSv the stochastic low-dose
//! BEIR VII models (with their DDREF reduction) apply; at and above 100 mSv
//! the BEIR V committee models take over. Doses beyond 4 Sv fall outside the
//! domain of applicability of both reports and are not computed at all.

use dosim_core::types::ModelKind;

/// Dose at and above which the high-dose BEIR V models apply, in sievert.
pub const HIGH_DOSE_THRESHOLD_SV: f64 = 0.1;

/// Upper bound of the models' domain of applicability, in sievert.
pub const MODEL_DOMAIN_CAP_SV: f64 = 4.0;

/// Selects the model for an organ dose.
///
/// Deterministic and monotonic in dose: every dose below the threshold maps
/// to BEIR VII, every dose at or above it to BEIR V.
///
/// # Examples
/// ```
/// use dosim_core::types::ModelKind;
/// use dosim_models::select_model;
///
/// assert_eq!(select_model(0.05), ModelKind::BeirVii);
/// assert_eq!(select_model(0.1), ModelKind::BeirV);
/// ```
#[inline]
pub fn select_model(dose_sv: f64) -> ModelKind {
    if dose_sv < HIGH_DOSE_THRESHOLD_SV {
        ModelKind::BeirVii
    } else {
        ModelKind::BeirV
    }
}

/// Whether a dose lies within the models' domain of applicability.
#[inline]
pub fn within_model_domain(dose_sv: f64) -> bool {
    dose_sv <= MODEL_DOMAIN_CAP_SV
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_dose_selects_beir_vii() {
        assert_eq!(select_model(0.0), ModelKind::BeirVii);
        assert_eq!(select_model(0.05), ModelKind::BeirVii);
        assert_eq!(select_model(0.099_999), ModelKind::BeirVii);
    }

    #[test]
    fn test_threshold_boundary_selects_beir_v() {
        // Exactly 100 mSv belongs to the high-dose regime.
        assert_eq!(select_model(HIGH_DOSE_THRESHOLD_SV), ModelKind::BeirV);
        assert_eq!(select_model(0.2), ModelKind::BeirV);
        assert_eq!(select_model(3.9), ModelKind::BeirV);
    }

    #[test]
    fn test_selection_monotonic_in_dose() {
        let mut seen_high = false;
        for step in 0..400 {
            let dose = f64::from(step) * 0.001;
            match select_model(dose) {
                ModelKind::BeirV => seen_high = true,
                ModelKind::BeirVii => {
                    assert!(!seen_high, "selection regressed to BEIR VII at {dose} Sv");
                }
            }
        }
        assert!(seen_high);
    }

    #[test]
    fn test_domain_cap_inclusive() {
        assert!(within_model_domain(0.0));
        assert!(within_model_domain(4.0));
        assert!(!within_model_domain(4.000_1));
    }
}
