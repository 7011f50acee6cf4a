//! Demographic selector for coefficient lookup.

use std::fmt;

/// Sex of the assessed individual.
///
/// The BEIR coefficient tables are sex-specific; several sites carry a
/// coefficient for only one sex (breast, ovary and uterus for females,
/// prostate for males).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sex {
    /// Male
    Male,
    /// Female
    Female,
}

impl Sex {
    /// Returns the single-letter code used in parameter files and reports.
    pub fn code(&self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Male => f.write_str("male"),
            Sex::Female => f.write_str("female"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(Sex::Male.code(), "M");
        assert_eq!(Sex::Female.code(), "F");
    }

    #[test]
    fn test_display() {
        assert_eq!(Sex::Female.to_string(), "female");
    }
}
