//! Per-dependency set of available updates

use super::classify::classify;
use super::filtered::FilteredSequence;
use crate::domain::{Dependency, Magnitude, VersionTuple};
use crate::error::UpdateError;
use std::collections::btree_set;
use std::collections::BTreeSet;

/// A candidate paired with its magnitude, or the inconsistency found while classifying it
pub type Classification<'a> = Result<(&'a VersionTuple, Magnitude), UpdateError>;

/// Candidates of an [`UpdateSet`] in ascending order, classified one at a time
#[derive(Debug, Clone)]
pub struct Classified<'a> {
    dependency: &'a Dependency,
    candidates: btree_set::Iter<'a, VersionTuple>,
}

impl<'a> Iterator for Classified<'a> {
    type Item = Classification<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let candidate = self.candidates.next()?;
        Some(classify(self.dependency, candidate, self.dependency.version()).map(|m| (candidate, m)))
    }
}

/// The current version of a dependency and the accepted newer versions
///
/// Candidates are kept deduplicated in ascending version order. The set is
/// immutable once built; magnitudes are computed per query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateSet {
    dependency: Dependency,
    candidates: BTreeSet<VersionTuple>,
}

impl UpdateSet {
    /// Build from a dependency and its already accepted candidates
    pub fn new(dependency: Dependency, candidates: impl IntoIterator<Item = VersionTuple>) -> Self {
        Self {
            dependency,
            candidates: candidates.into_iter().collect(),
        }
    }

    /// The dependency this set belongs to
    pub fn dependency(&self) -> &Dependency {
        &self.dependency
    }

    /// The dependency's selected version
    pub fn current_version(&self) -> &VersionTuple {
        self.dependency.version()
    }

    /// All candidates in ascending order
    pub fn candidates(&self) -> impl Iterator<Item = &VersionTuple> {
        self.candidates.iter()
    }

    /// Number of distinct candidates
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// True if no newer version was accepted
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// The smallest candidate, if any
    pub fn next_version(&self) -> Option<&VersionTuple> {
        self.candidates.first()
    }

    /// Magnitude of the nearest available update, `Equal` when there is none
    pub fn smallest_difference(&self) -> Result<Magnitude, UpdateError> {
        match self.next_version() {
            Some(next) => classify(&self.dependency, next, self.current_version()),
            None => Ok(Magnitude::Equal),
        }
    }

    /// Every candidate with its magnitude, in ascending order
    pub fn classified(&self) -> Classified<'_> {
        Classified {
            dependency: &self.dependency,
            candidates: self.candidates.iter(),
        }
    }

    /// Lazily yields the candidates of exactly `magnitude`, ascending.
    ///
    /// Each call starts from the smallest candidate. An inconsistent candidate
    /// is yielded as an error where it occurs in the sequence.
    pub fn updates_of<'a>(
        &'a self,
        magnitude: Magnitude,
    ) -> FilteredSequence<Classified<'a>, impl FnMut(&Classification<'a>) -> bool + 'a> {
        FilteredSequence::new(self.classified(), move |item: &Classification<'a>| match item {
            Ok((_, m)) => *m == magnitude,
            Err(_) => true,
        })
    }

    /// Collects [`UpdateSet::updates_of`], failing on the first inconsistency
    pub fn versions_of(&self, magnitude: Magnitude) -> Result<Vec<&VersionTuple>, UpdateError> {
        self.updates_of(magnitude)
            .map(|item| item.map(|(version, _)| version))
            .collect()
    }

    /// Classify every candidate once, failing on the first inconsistency
    pub fn verify(&self) -> Result<(), UpdateError> {
        self.classified().try_for_each(|item| item.map(|_| ()))
    }
}
