//! Risk results, per-document reports and the canonical tabular rendering.

use std::io;

use dosim_core::types::{CancerSite, ModelKind, Organ, Sex};

/// One organ's computed risk.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RiskResult {
    /// Organ the dose applied to.
    pub organ: Organ,
    /// Cancer site whose coefficients were used.
    pub site: CancerSite,
    /// Model selected for this organ.
    pub model: ModelKind,
    /// Input organ dose in sievert.
    pub dose_sv: f64,
    /// Excess relative risk, never negative.
    pub err: f64,
    /// Lifetime attributable risk contribution, never negative.
    pub lar: f64,
}

/// An organ whose computation was skipped, with the reason.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkippedOrgan {
    /// The skipped organ.
    pub organ: Organ,
    /// Why the computation could not run.
    pub reason: String,
}

/// The per-document result set.
///
/// An ordered sequence of per-organ results plus the aggregate lifetime
/// attributable risk. Organs omitted upstream or skipped by per-organ errors
/// do not contribute to the total.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RiskReport {
    /// Identifier of the source document.
    pub document: String,
    /// Age at exposure the report was computed for, in years.
    pub exposure_age: f64,
    /// Age at assessment the report was computed for, in years.
    pub assessment_age: f64,
    /// Sex the report was computed for.
    pub sex: Sex,
    /// Per-organ results, in stable organ order.
    pub results: Vec<RiskResult>,
    /// Organs skipped with their reasons.
    pub skipped: Vec<SkippedOrgan>,
    /// Sum of the per-organ lifetime attributable risk contributions.
    pub total_lar: f64,
}

impl RiskReport {
    /// Returns the result for an organ, if it computed.
    pub fn result_for(&self, organ: Organ) -> Option<&RiskResult> {
        self.results.iter().find(|r| r.organ == organ)
    }

    /// Whether the report carries no computed results at all.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Renders a batch of reports as the canonical tabular result.
///
/// One row per (document, organ) with dose, model and computed risk; skipped
/// organs appear with `N/A` figures; one `TOTAL` row closes each document.
///
/// # Errors
///
/// Propagates I/O errors from the underlying writer.
pub fn write_csv<W: io::Write>(reports: &[RiskReport], writer: W) -> Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record([
        "document",
        "organ",
        "site",
        "sex",
        "model",
        "dose_sv",
        "ERR",
        "LAR",
    ])?;

    for report in reports {
        let sex = report.sex.code();
        for result in &report.results {
            let dose = format!("{:.4e}", result.dose_sv);
            let err = format!("{:.4e}", result.err);
            let lar = format!("{:.4e}", result.lar);
            out.write_record([
                report.document.as_str(),
                result.organ.label(),
                result.site.label(),
                sex,
                result.model.name(),
                dose.as_str(),
                err.as_str(),
                lar.as_str(),
            ])?;
        }
        for skipped in &report.skipped {
            out.write_record([
                report.document.as_str(),
                skipped.organ.label(),
                skipped.organ.site().label(),
                sex,
                "N/A",
                "N/A",
                "N/A",
                "N/A",
            ])?;
        }
        let total = format!("{:.4e}", report.total_lar);
        out.write_record([
            report.document.as_str(),
            "TOTAL",
            "",
            sex,
            "",
            "",
            "",
            total.as_str(),
        ])?;
    }

    out.flush()?;
    Ok(())
}
