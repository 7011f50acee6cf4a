//! Raw dose observations produced by the extraction stage.

use super::Organ;

/// One dose value extracted from a simulation report.
///
/// Produced by the extractor, consumed by the dose-table transposition;
/// immutable once created. The originating line number is retained so that
/// every later diagnostic can point back into the source document.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawDoseObservation {
    /// Released nuclide as stated in the report header, when present.
    pub nuclide: Option<String>,
    /// Anatomy target the dose applies to.
    pub organ: Organ,
    /// Time marker of the enclosing report block, in hours after release.
    pub time_h: f64,
    /// Time-integrated committed dose, in sievert.
    pub dose_sv: f64,
    /// 1-based line number of the cell in the source document.
    pub line: usize,
}
