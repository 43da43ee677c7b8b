//! XML report formatter
//!
//! Produces the `DependencyUpdatesReport` document: a summary of
//! smallest-difference counts followed by one `dependency` element per
//! dependency with its available updates grouped by magnitude.

use crate::domain::VersionTuple;
use crate::error::ReportError;
use crate::output::{DependencyReport, Report, ReportFormatter};
use quick_xml::se::Serializer;
use serde::Serialize;

/// XML formatter for the report file
pub struct XmlFormatter;

#[derive(Serialize)]
struct DependencyUpdatesReport<'a> {
    summary: XmlSummary,
    dependencies: XmlDependencies<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct XmlSummary {
    using_last_version: usize,
    next_version_available: usize,
    next_incremental_available: usize,
    next_minor_available: usize,
    next_major_available: usize,
}

#[derive(Serialize)]
struct XmlDependencies<'a> {
    dependency: Vec<XmlDependency<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct XmlDependency<'a> {
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
    #[serde(skip_serializing_if = "Option::is_none")]
    incrementals: Option<Incrementals<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    minors: Option<Minors<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    majors: Option<Majors<'a>>,
    status: &'static str,
}

#[derive(Serialize)]
struct Incrementals<'a> {
    incremental: Vec<&'a str>,
}

#[derive(Serialize)]
struct Minors<'a> {
    minor: Vec<&'a str>,
}

#[derive(Serialize)]
struct Majors<'a> {
    major: Vec<&'a str>,
}

/// Version texts, or `None` for an empty list
fn texts<'a>(versions: &[&'a VersionTuple]) -> Option<Vec<&'a str>> {
    if versions.is_empty() {
        None
    } else {
        Some(versions.iter().map(|v| v.as_str()).collect())
    }
}

impl<'a> From<&DependencyReport<'a>> for XmlDependency<'a> {
    fn from(report: &DependencyReport<'a>) -> Self {
        let dependency = report.dependency;
        Self {
            group_id: &dependency.group_id,
            artifact_id: &dependency.artifact_id,
            scope: dependency.scope.as_deref(),
            classifier: dependency.classifier.as_deref(),
            packaging: &dependency.packaging,
            current_version: report.current_version().as_str(),
            next_version: report.next_version.map(VersionTuple::as_str),
            incrementals: texts(&report.incrementals).map(|incremental| Incrementals { incremental }),
            minors: texts(&report.minors).map(|minor| Minors { minor }),
            majors: texts(&report.majors).map(|major| Majors { major }),
            status: report.status().label(),
        }
    }
}

impl ReportFormatter for XmlFormatter {
    fn render(&self, report: &Report<'_>) -> Result<String, ReportError> {
        let summary = report.summary;
        let document = DependencyUpdatesReport {
            summary: XmlSummary {
                using_last_version: summary.using_last_version,
                next_version_available: summary.next_version_available,
                next_incremental_available: summary.next_incremental_available,
                next_minor_available: summary.next_minor_available,
                next_major_available: summary.next_major_available,
            },
            dependencies: XmlDependencies {
                dependency: report.dependencies.iter().map(XmlDependency::from).collect(),
            },
        };

        let mut buffer = String::new();
        let mut serializer = Serializer::new(&mut buffer);
        serializer.indent(' ', 2);
        document
            .serialize(serializer)
            .map_err(|e| ReportError::SerializeError {
                format: "XML",
                message: e.to_string(),
            })?;
        buffer.push('\n');
        Ok(buffer)
    }
}
