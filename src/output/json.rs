//! JSON output formatter for machine processing
//!
//! Carries the same data as the XML report with one object per dependency.

use crate::domain::VersionTuple;
use crate::error::ReportError;
use crate::output::{DependencyReport, Report, ReportFormatter};
use serde::Serialize;

/// JSON formatter for machine-readable reports
pub struct JsonFormatter;

/// JSON representation of the full report
#[derive(Serialize)]
struct JsonOutput<'a> {
    /// Summary statistics
    summary: JsonSummary,
    /// Per-dependency results
    dependencies: Vec<JsonDependency<'a>>,
}

/// Number of dependencies per smallest available update
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSummary {
    using_last_version: usize,
    next_version_available: usize,
    next_incremental_available: usize,
    next_minor_available: usize,
    next_major_available: usize,
}

/// JSON representation of a dependency
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonDependency<'a> {
    group_id: &'a str,
    artifact_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    classifier: Option<&'a str>,
    #[serde(rename = "type")]
    packaging: &'a str,
    current_version: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_version: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    incrementals: Vec<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    minors: Vec<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    majors: Vec<&'a str>,
    status: &'static str,
}

impl JsonFormatter {
    /// Convert a dependency report to its JSON representation
    fn dependency_to_json<'a>(report: &DependencyReport<'a>) -> JsonDependency<'a> {
        let texts = |versions: &[&'a VersionTuple]| -> Vec<&'a str> {
            versions.iter().map(|v| v.as_str()).collect()
        };
        let dependency = report.dependency;

        JsonDependency {
            group_id: &dependency.group_id,
            artifact_id: &dependency.artifact_id,
            scope: dependency.scope.as_deref(),
            classifier: dependency.classifier.as_deref(),
            packaging: &dependency.packaging,
            current_version: report.current_version().as_str(),
            next_version: report.next_version.map(VersionTuple::as_str),
            incrementals: texts(&report.incrementals),
            minors: texts(&report.minors),
            majors: texts(&report.majors),
            status: report.status().label(),
        }
    }
}

impl ReportFormatter for JsonFormatter {
    fn render(&self, report: &Report<'_>) -> Result<String, ReportError> {
        let summary = report.summary;
        let output = JsonOutput {
            summary: JsonSummary {
                using_last_version: summary.using_last_version,
                next_version_available: summary.next_version_available,
                next_incremental_available: summary.next_incremental_available,
                next_minor_available: summary.next_minor_available,
                next_major_available: summary.next_major_available,
            },
            dependencies: report
                .dependencies
                .iter()
                .map(Self::dependency_to_json)
                .collect(),
        };

        let mut json = serde_json::to_string_pretty(&output).map_err(|e| {
            ReportError::SerializeError {
                format: "JSON",
                message: e.to_string(),
            }
        })?;
        json.push('\n');
        Ok(json)
    }
}
