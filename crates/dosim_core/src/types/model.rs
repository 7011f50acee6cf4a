//! Risk-model identification.

use std::fmt;

/// The published model a risk figure was computed with.
///
/// Selection between the two is a deterministic, per-organ decision driven by
/// the magnitude of the organ dose (see the model-selection rule in
/// `dosim_models`); a forced override can pin a whole run to one model.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModelKind {
    /// BEIR V (1990), the high-dose committee models.
    BeirV,
    /// BEIR VII phase 2 (2006), the low-dose ERR models.
    BeirVii,
}

impl ModelKind {
    /// Returns the report name of the model.
    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::BeirV => "BEIR V",
            ModelKind::BeirVii => "BEIR VII",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(ModelKind::BeirV.name(), "BEIR V");
        assert_eq!(ModelKind::BeirVii.to_string(), "BEIR VII");
    }
}
