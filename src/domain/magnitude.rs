//! Magnitude of the difference between two versions

use super::VersionField;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Most significant field that differs between an update and the current version
///
/// Variants are declared from least to most severe so the derived ordering
/// reads `Major > Minor > Incremental > SubIncremental > Equal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Magnitude {
    /// No numeric field differs
    Equal,
    /// Only the build number differs
    SubIncremental,
    /// Incremental (patch) version differs
    Incremental,
    /// Minor version differs
    Minor,
    /// Major version differs
    Major,
}

impl Magnitude {
    /// All magnitudes from most to least severe
    pub const ALL: [Magnitude; 5] = [
        Magnitude::Major,
        Magnitude::Minor,
        Magnitude::Incremental,
        Magnitude::SubIncremental,
        Magnitude::Equal,
    ];

    /// Magnitude reported when `field` is the first field that increased
    pub fn of_field(field: VersionField) -> Self {
        match field {
            VersionField::Major => Magnitude::Major,
            VersionField::Minor => Magnitude::Minor,
            VersionField::Incremental => Magnitude::Incremental,
            VersionField::BuildNumber => Magnitude::SubIncremental,
        }
    }

    /// Lower-case name used for report elements (`major`, `minor`, ...)
    pub fn element_name(&self) -> &'static str {
        match self {
            Magnitude::Major => "major",
            Magnitude::Minor => "minor",
            Magnitude::Incremental => "incremental",
            Magnitude::SubIncremental => "subincremental",
            Magnitude::Equal => "equal",
        }
    }

    /// Returns the display name for this magnitude
    pub fn display_name(&self) -> &'static str {
        match self {
            Magnitude::Major => "Major",
            Magnitude::Minor => "Minor",
            Magnitude::Incremental => "Incremental",
            Magnitude::SubIncremental => "SubIncremental",
            Magnitude::Equal => "Equal",
        }
    }
}

impl fmt::Display for Magnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
