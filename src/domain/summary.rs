//! Summary counts of dependencies by their nearest available update

use super::Magnitude;
use serde::{Deserialize, Serialize};

/// Number of dependencies in each smallest-difference bucket
///
/// A dependency is counted once, in the bucket of its nearest update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSummary {
    /// Dependencies already on the newest acceptable version
    pub using_last_version: usize,
    /// Nearest update differs only in the build number
    pub next_version_available: usize,
    /// Nearest update is an incremental update
    pub next_incremental_available: usize,
    /// Nearest update is a minor update
    pub next_minor_available: usize,
    /// Nearest update is a major update
    pub next_major_available: usize,
}

impl UpdateSummary {
    /// Creates an empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one dependency whose smallest difference is `magnitude`
    pub fn add(&mut self, magnitude: Magnitude) {
        *self.bucket_mut(magnitude) += 1;
    }

    /// Returns the count for a magnitude bucket
    pub fn count(&self, magnitude: Magnitude) -> usize {
        match magnitude {
            Magnitude::Equal => self.using_last_version,
            Magnitude::SubIncremental => self.next_version_available,
            Magnitude::Incremental => self.next_incremental_available,
            Magnitude::Minor => self.next_minor_available,
            Magnitude::Major => self.next_major_available,
        }
    }

    fn bucket_mut(&mut self, magnitude: Magnitude) -> &mut usize {
        match magnitude {
            Magnitude::Equal => &mut self.using_last_version,
            Magnitude::SubIncremental => &mut self.next_version_available,
            Magnitude::Incremental => &mut self.next_incremental_available,
            Magnitude::Minor => &mut self.next_minor_available,
            Magnitude::Major => &mut self.next_major_available,
        }
    }

    /// Returns the total number of dependencies counted
    pub fn total(&self) -> usize {
        Magnitude::ALL.iter().map(|m| self.count(*m)).sum()
    }

    /// Returns the number of dependencies with any update available
    pub fn outdated(&self) -> usize {
        self.total() - self.using_last_version
    }
}

impl FromIterator<Magnitude> for UpdateSummary {
    fn from_iter<I: IntoIterator<Item = Magnitude>>(iter: I) -> Self {
        let mut summary = Self::new();
        for magnitude in iter {
            summary.add(magnitude);
        }
        summary
    }
}
