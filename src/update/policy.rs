//! Acceptance policy for candidate versions
//!
//! This module provides the AcceptancePolicy trait consulted for every
//! candidate newer than the selected version, and the QualifierPolicy
//! implementation that only admits release qualifiers.

use crate::domain::{Dependency, VersionTuple};
use crate::error::ConfigError;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Default qualifier allow-list
pub const DEFAULT_QUALIFIER_PATTERN: &str = "(?i:Final|GA|Release)";

static DEFAULT_QUALIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&anchored(DEFAULT_QUALIFIER_PATTERN)).unwrap());

/// The qualifier must match as a whole
fn anchored(pattern: &str) -> String {
    format!("^(?:{})$", pattern)
}

/// Decides whether a candidate version may be reported as an update
pub trait AcceptancePolicy: Send + Sync {
    /// Returns true if `candidate` is eligible for `dependency`
    fn accept(&self, dependency: &Dependency, candidate: &VersionTuple) -> bool;
}

/// Accepts every candidate
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl AcceptancePolicy for AcceptAll {
    fn accept(&self, _dependency: &Dependency, _candidate: &VersionTuple) -> bool {
        true
    }
}

/// Accepts candidates without a qualifier, or whose qualifier fully matches a pattern
#[derive(Debug, Clone)]
pub struct QualifierPolicy {
    /// The pattern as configured
    pattern: String,
    /// The pattern anchored at both ends
    regex: Regex,
}

impl QualifierPolicy {
    /// Create a policy from a qualifier pattern
    pub fn new(pattern: impl Into<String>) -> Result<Self, ConfigError> {
        let pattern = pattern.into();
        let regex = Regex::new(&anchored(&pattern)).map_err(|e| {
            ConfigError::InvalidQualifierPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            }
        })?;
        Ok(Self { pattern, regex })
    }

    /// The configured pattern
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl Default for QualifierPolicy {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_QUALIFIER_PATTERN.to_string(),
            regex: DEFAULT_QUALIFIER_RE.clone(),
        }
    }
}

impl AcceptancePolicy for QualifierPolicy {
    fn accept(&self, dependency: &Dependency, candidate: &VersionTuple) -> bool {
        let Some(qualifier) = candidate.qualifier() else {
            return true;
        };
        let matched = self.regex.is_match(qualifier);
        debug!(
            dependency = %dependency.coordinate(),
            version = %candidate,
            qualifier,
            pattern = %self.pattern,
            matched,
            "qualifier check"
        );
        matched
    }
}

/// Combined acceptance used while building an update set: the candidate must be
/// strictly newer than the selected version and pass `policy`
pub fn is_acceptable_update(
    dependency: &Dependency,
    candidate: &VersionTuple,
    policy: &dyn AcceptancePolicy,
) -> bool {
    if candidate <= dependency.version() {
        debug!(
            dependency = %dependency.coordinate(),
            version = %candidate,
            selected = %dependency.version(),
            "older version ignored"
        );
        return false;
    }
    policy.accept(dependency, candidate)
}
