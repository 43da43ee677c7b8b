//! Magnitude classification of a candidate against the current version

use crate::domain::{Dependency, Magnitude, VersionField, VersionTuple};
use crate::error::UpdateError;
use std::cmp::Ordering;

/// Classify how far `candidate` is ahead of `current`.
///
/// Fields are compared from most to least significant; the first field that
/// increased decides the magnitude. A field that decreased before any more
/// significant field increased means the candidate is older than the current
/// version, which is reported as [`UpdateError::InconsistentVersion`].
pub fn classify(
    dependency: &Dependency,
    candidate: &VersionTuple,
    current: &VersionTuple,
) -> Result<Magnitude, UpdateError> {
    for field in VersionField::ALL {
        let update = candidate.field(field);
        let selected = current.field(field);
        match update.cmp(&selected) {
            Ordering::Greater => return Ok(Magnitude::of_field(field)),
            Ordering::Less => {
                return Err(UpdateError::inconsistent(
                    dependency.to_string(),
                    field,
                    update,
                    selected,
                ))
            }
            Ordering::Equal => continue,
        }
    }
    Ok(Magnitude::Equal)
}
