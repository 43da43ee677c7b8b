//! Output formatting for retrieval results
//!
//! This module provides:
//! - XML report in the dependency-updates-report layout
//! - JSON report for machine processing
//! - Coloured terminal summary

mod json;
mod text;
mod xml;

pub use json::JsonFormatter;
pub use text::TextFormatter;
pub use xml::XmlFormatter;

use crate::domain::{Dependency, Magnitude, UpdateSummary, VersionTuple};
use crate::error::{ReportError, UpdateError};
use crate::orchestrator::RetrievalResult;
use crate::update::UpdateSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Report file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// XML report
    #[default]
    Xml,
    /// JSON report
    Json,
}

impl OutputFormat {
    /// File extension of the format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Xml => "xml",
            OutputFormat::Json => "json",
        }
    }

    /// Default report file name
    pub fn default_file_name(&self) -> String {
        format!("dependency-updates-report.{}", self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xml" => Ok(OutputFormat::Xml),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown format '{}' (expected xml or json)", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Status line of a dependency, decided by the least significant available update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    IncrementalAvailable,
    MinorAvailable,
    MajorAvailable,
    NoNewAvailable,
}

impl UpdateStatus {
    /// Report label
    pub fn label(&self) -> &'static str {
        match self {
            UpdateStatus::IncrementalAvailable => "incremental available",
            UpdateStatus::MinorAvailable => "minor available",
            UpdateStatus::MajorAvailable => "major available",
            UpdateStatus::NoNewAvailable => "no new available",
        }
    }
}

impl fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Report data of one dependency
#[derive(Debug, Clone)]
pub struct DependencyReport<'a> {
    pub dependency: &'a Dependency,
    pub next_version: Option<&'a VersionTuple>,
    pub smallest_difference: Magnitude,
    pub incrementals: Vec<&'a VersionTuple>,
    pub minors: Vec<&'a VersionTuple>,
    pub majors: Vec<&'a VersionTuple>,
}

impl<'a> DependencyReport<'a> {
    /// Classify the candidates of an update set
    pub fn from_update_set(set: &'a UpdateSet) -> Result<Self, UpdateError> {
        Ok(Self {
            dependency: set.dependency(),
            next_version: set.next_version(),
            smallest_difference: set.smallest_difference()?,
            incrementals: set.versions_of(Magnitude::Incremental)?,
            minors: set.versions_of(Magnitude::Minor)?,
            majors: set.versions_of(Magnitude::Major)?,
        })
    }

    /// The dependency's selected version
    pub fn current_version(&self) -> &'a VersionTuple {
        self.dependency.version()
    }

    /// Derived status
    pub fn status(&self) -> UpdateStatus {
        if !self.incrementals.is_empty() {
            UpdateStatus::IncrementalAvailable
        } else if !self.minors.is_empty() {
            UpdateStatus::MinorAvailable
        } else if !self.majors.is_empty() {
            UpdateStatus::MajorAvailable
        } else {
            UpdateStatus::NoNewAvailable
        }
    }
}

/// Everything a report shows, in dependency order
#[derive(Debug, Clone)]
pub struct Report<'a> {
    pub summary: UpdateSummary,
    pub dependencies: Vec<DependencyReport<'a>>,
}

impl<'a> Report<'a> {
    /// Build the report of a retrieval result
    pub fn new(result: &'a RetrievalResult) -> Result<Self, UpdateError> {
        let dependencies = result
            .iter()
            .map(|(_, set)| DependencyReport::from_update_set(set))
            .collect::<Result<Vec<_>, _>>()?;
        let summary = dependencies
            .iter()
            .map(|d| d.smallest_difference)
            .collect();
        Ok(Self {
            summary,
            dependencies,
        })
    }
}

/// Trait for report file formatters
pub trait ReportFormatter {
    /// Render the whole report
    fn render(&self, report: &Report<'_>) -> Result<String, ReportError>;
}

/// Create a report formatter for a file format
pub fn create_formatter(format: OutputFormat) -> Box<dyn ReportFormatter> {
    match format {
        OutputFormat::Xml => Box::new(XmlFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Write rendered report contents, creating parent directories
pub fn write_report(path: &Path, contents: &str) -> Result<(), ReportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ReportError::write_error(path, e))?;
    }
    std::fs::write(path, contents).map_err(|e| ReportError::write_error(path, e))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A result covering every status
    pub fn sample_result() -> RetrievalResult {
        let set = |artifact: &str, current: &str, candidates: &[&str]| {
            UpdateSet::new(
                Dependency::new("org.example", artifact, current).with_scope("compile"),
                candidates.iter().map(|c| VersionTuple::parse(c)),
            )
        };
        vec![
            set("alpha", "1.0.0", &["1.0.1", "1.1.0", "2.0.0"]),
            set("beta", "1.0.0", &["1.1.0", "1.2.0"]),
            set("gamma", "1.0.0", &["3.0.0"]),
            set("delta", "1.0.0", &[]),
            set("epsilon", "1.0.0", &["1.0.0-1"]),
        ]
        .into_iter()
        .collect()
    }
}
