//! Anatomy labels and epidemiological cancer sites.
//!
//! HotSpot reports dose per anatomical target (the organ table of each time
//! block), while the BEIR committees publish risk coefficients per cancer
//! site. The two vocabularies do not line up one-to-one: both large-intestine
//! walls map to the colon site, red marrow maps to leukaemia, and most of the
//! remaining anatomy collapses into the "other solid" site.
//!
//! # Examples
//!
//! ```
//! use dosim_core::types::{CancerSite, Organ};
//!
//! let organ = Organ::from_label("ULI Wall").unwrap();
//! assert_eq!(organ, Organ::UliWall);
//! assert_eq!(organ.site(), CancerSite::Colon);
//! ```

use std::fmt;
use std::str::FromStr;

/// Anatomical dose targets as labelled in HotSpot output tables.
///
/// Each variant corresponds to one organ row of the per-distance dose table
/// emitted by the simulation tool. Parsing is case-insensitive and tolerant
/// of the underscore/space variation seen across report versions.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Organ {
    /// Skin
    Skin,
    /// Bone surface (reported as "Surface Bone")
    BoneSurface,
    /// Spleen
    Spleen,
    /// Breast
    Breast,
    /// Upper large intestine wall
    UliWall,
    /// Thymus
    Thymus,
    /// Kidneys
    Kidneys,
    /// Pancreas
    Pancreas,
    /// Lung
    Lung,
    /// Red (active) bone marrow
    RedMarrow,
    /// Ovaries
    Ovaries,
    /// Stomach wall
    StomachWall,
    /// Lower large intestine wall
    LliWall,
    /// Esophagus
    Esophagus,
    /// Testes
    Testes,
    /// Brain
    Brain,
    /// Thyroid
    Thyroid,
    /// Liver
    Liver,
    /// Adrenal glands
    Adrenals,
    /// Small intestine wall
    SiWall,
    /// Bladder wall
    BladderWall,
    /// Muscle
    Muscle,
    /// Uterus
    Uterus,
}

impl Organ {
    /// All known anatomy targets, in report order.
    pub const ALL: [Organ; 23] = [
        Organ::Skin,
        Organ::BoneSurface,
        Organ::Spleen,
        Organ::Breast,
        Organ::UliWall,
        Organ::Thymus,
        Organ::Kidneys,
        Organ::Pancreas,
        Organ::Lung,
        Organ::RedMarrow,
        Organ::Ovaries,
        Organ::StomachWall,
        Organ::LliWall,
        Organ::Esophagus,
        Organ::Testes,
        Organ::Brain,
        Organ::Thyroid,
        Organ::Liver,
        Organ::Adrenals,
        Organ::SiWall,
        Organ::BladderWall,
        Organ::Muscle,
        Organ::Uterus,
    ];

    /// Parses a report label into an organ.
    ///
    /// Labels are matched case-insensitively after collapsing whitespace and
    /// underscores, so `"Surface Bone"`, `"surface_bone"` and `"SURFACE  BONE"`
    /// all resolve to [`Organ::BoneSurface`]. Returns `None` for labels the
    /// anatomy table does not know.
    pub fn from_label(label: &str) -> Option<Organ> {
        let normalized = label
            .split(|c: char| c.is_whitespace() || c == '_')
            .filter(|part| !part.is_empty())
            .map(str::to_ascii_lowercase)
            .collect::<Vec<_>>()
            .join(" ");

        let organ = match normalized.as_str() {
            "skin" => Organ::Skin,
            "surface bone" | "bone surface" => Organ::BoneSurface,
            "spleen" => Organ::Spleen,
            "breast" => Organ::Breast,
            "uli wall" => Organ::UliWall,
            "thymus" => Organ::Thymus,
            "kidneys" => Organ::Kidneys,
            "pancreas" => Organ::Pancreas,
            "lung" => Organ::Lung,
            "red marrow" => Organ::RedMarrow,
            "ovaries" => Organ::Ovaries,
            "stomach wall" => Organ::StomachWall,
            "lli wall" => Organ::LliWall,
            "esophagus" => Organ::Esophagus,
            "testes" => Organ::Testes,
            "brain" => Organ::Brain,
            "thyroid" => Organ::Thyroid,
            "liver" => Organ::Liver,
            "adrenals" => Organ::Adrenals,
            "si wall" => Organ::SiWall,
            "bladder wall" => Organ::BladderWall,
            "muscle" => Organ::Muscle,
            "uterus" => Organ::Uterus,
            _ => return None,
        };
        Some(organ)
    }

    /// Returns the canonical report label for this organ.
    pub fn label(&self) -> &'static str {
        match self {
            Organ::Skin => "Skin",
            Organ::BoneSurface => "Surface Bone",
            Organ::Spleen => "Spleen",
            Organ::Breast => "Breast",
            Organ::UliWall => "ULI Wall",
            Organ::Thymus => "Thymus",
            Organ::Kidneys => "Kidneys",
            Organ::Pancreas => "Pancreas",
            Organ::Lung => "Lung",
            Organ::RedMarrow => "Red Marrow",
            Organ::Ovaries => "Ovaries",
            Organ::StomachWall => "Stomach Wall",
            Organ::LliWall => "LLI Wall",
            Organ::Esophagus => "Esophagus",
            Organ::Testes => "Testes",
            Organ::Brain => "Brain",
            Organ::Thyroid => "Thyroid",
            Organ::Liver => "Liver",
            Organ::Adrenals => "Adrenals",
            Organ::SiWall => "SI Wall",
            Organ::BladderWall => "Bladder Wall",
            Organ::Muscle => "Muscle",
            Organ::Uterus => "Uterus",
        }
    }

    /// Maps the anatomy target to the BEIR cancer site whose coefficients
    /// apply to it.
    ///
    /// The committees publish site-specific models only for a handful of
    /// organs; everything else is covered by the pooled "other solid" site.
    pub fn site(&self) -> CancerSite {
        match self {
            Organ::StomachWall => CancerSite::Stomach,
            Organ::UliWall | Organ::LliWall => CancerSite::Colon,
            Organ::Liver => CancerSite::Liver,
            Organ::Lung => CancerSite::Lung,
            Organ::Breast => CancerSite::Breast,
            Organ::Uterus => CancerSite::Uterus,
            Organ::Ovaries => CancerSite::Ovary,
            Organ::BladderWall => CancerSite::Bladder,
            Organ::Thyroid => CancerSite::Thyroid,
            Organ::RedMarrow => CancerSite::Leukemia,
            Organ::Skin
            | Organ::BoneSurface
            | Organ::Spleen
            | Organ::Thymus
            | Organ::Kidneys
            | Organ::Pancreas
            | Organ::Esophagus
            | Organ::Testes
            | Organ::Brain
            | Organ::Adrenals
            | Organ::SiWall
            | Organ::Muscle => CancerSite::OtherSolid,
        }
    }
}

impl fmt::Display for Organ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Organ {
    type Err = UnknownOrganError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Organ::from_label(s).ok_or_else(|| UnknownOrganError {
            label: s.to_string(),
        })
    }
}

/// Error returned when a report label does not match any known organ.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown organ label: {label}")]
pub struct UnknownOrganError {
    /// The label that failed to parse.
    pub label: String,
}

/// Cancer sites for which the BEIR reports publish coefficient tables.
///
/// This is the key of the model parameter set: every site must carry a
/// complete coefficient record, which is checked once at load time rather
/// than at each computation.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CancerSite {
    /// Stomach
    Stomach,
    /// Colon
    Colon,
    /// Liver
    Liver,
    /// Lung
    Lung,
    /// Female breast
    Breast,
    /// Prostate
    Prostate,
    /// Uterus
    Uterus,
    /// Ovary
    Ovary,
    /// Urinary bladder
    Bladder,
    /// Thyroid
    Thyroid,
    /// Leukaemia (red bone marrow)
    Leukemia,
    /// Pooled remaining solid cancers
    OtherSolid,
}

impl CancerSite {
    /// All sites a parameter set must cover.
    pub const ALL: [CancerSite; 12] = [
        CancerSite::Stomach,
        CancerSite::Colon,
        CancerSite::Liver,
        CancerSite::Lung,
        CancerSite::Breast,
        CancerSite::Prostate,
        CancerSite::Uterus,
        CancerSite::Ovary,
        CancerSite::Bladder,
        CancerSite::Thyroid,
        CancerSite::Leukemia,
        CancerSite::OtherSolid,
    ];

    /// Returns the site label used in parameter files.
    pub fn label(&self) -> &'static str {
        match self {
            CancerSite::Stomach => "stomach",
            CancerSite::Colon => "colon",
            CancerSite::Liver => "liver",
            CancerSite::Lung => "lung",
            CancerSite::Breast => "breast",
            CancerSite::Prostate => "prostate",
            CancerSite::Uterus => "uterus",
            CancerSite::Ovary => "ovary",
            CancerSite::Bladder => "bladder",
            CancerSite::Thyroid => "thyroid",
            CancerSite::Leukemia => "leukemia",
            CancerSite::OtherSolid => "other_solid",
        }
    }

    /// Parses a parameter-file label into a site.
    pub fn from_label(label: &str) -> Option<CancerSite> {
        let normalized = label.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        CancerSite::ALL
            .iter()
            .copied()
            .find(|site| site.label() == normalized)
    }
}

impl fmt::Display for CancerSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label_case_and_separator_insensitive() {
        assert_eq!(Organ::from_label("thyroid"), Some(Organ::Thyroid));
        assert_eq!(Organ::from_label("Thyroid"), Some(Organ::Thyroid));
        assert_eq!(Organ::from_label("surface_bone"), Some(Organ::BoneSurface));
        assert_eq!(Organ::from_label("Surface  Bone"), Some(Organ::BoneSurface));
        assert_eq!(Organ::from_label("ULI Wall"), Some(Organ::UliWall));
    }

    #[test]
    fn test_from_label_unknown() {
        assert_eq!(Organ::from_label("effective"), None);
        assert_eq!(Organ::from_label(""), None);
    }

    #[test]
    fn test_label_round_trip() {
        for organ in Organ::ALL {
            assert_eq!(Organ::from_label(organ.label()), Some(organ));
        }
    }

    #[test]
    fn test_intestine_walls_share_colon_site() {
        assert_eq!(Organ::UliWall.site(), CancerSite::Colon);
        assert_eq!(Organ::LliWall.site(), CancerSite::Colon);
    }

    #[test]
    fn test_red_marrow_maps_to_leukemia() {
        assert_eq!(Organ::RedMarrow.site(), CancerSite::Leukemia);
    }

    #[test]
    fn test_remainder_anatomy_maps_to_other_solid() {
        for organ in [Organ::Skin, Organ::Muscle, Organ::Brain, Organ::Testes] {
            assert_eq!(organ.site(), CancerSite::OtherSolid);
        }
    }

    #[test]
    fn test_site_label_round_trip() {
        for site in CancerSite::ALL {
            assert_eq!(CancerSite::from_label(site.label()), Some(site));
        }
        assert_eq!(CancerSite::from_label("Other Solid"), Some(CancerSite::OtherSolid));
        assert_eq!(CancerSite::from_label("plutonium"), None);
    }

    #[test]
    fn test_from_str_error_carries_label() {
        let err = "gallbladder".parse::<Organ>().unwrap_err();
        assert_eq!(err.label, "gallbladder");
    }
}
