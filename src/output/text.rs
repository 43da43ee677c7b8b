//! Text output formatter for the terminal
//!
//! This module provides:
//! - One line per outdated dependency with its next version
//! - Magnitude labels coloured by severity
//! - Summary with the per-magnitude breakdown

use crate::domain::Magnitude;
use crate::output::{DependencyReport, Report};
use colored::Colorize;
use std::io::Write;
use std::path::Path;

/// Coloured label of a magnitude
fn colored_label(magnitude: Magnitude) -> String {
    let label = magnitude.element_name();
    match magnitude {
        Magnitude::Major => label.red().bold().to_string(),
        Magnitude::Minor => label.yellow().to_string(),
        Magnitude::Incremental => label.green().to_string(),
        Magnitude::SubIncremental | Magnitude::Equal => label.dimmed().to_string(),
    }
}

/// Text formatter for the terminal summary
pub struct TextFormatter {
    /// List up-to-date dependencies too
    verbose: bool,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbose: bool, color: bool) -> Self {
        Self { verbose, color }
    }

    /// Calculate the maximum coordinate length for alignment
    fn max_name_length(&self, dependencies: &[&DependencyReport<'_>]) -> usize {
        dependencies
            .iter()
            .map(|d| d.dependency.coordinate().len())
            .max()
            .unwrap_or(0)
    }

    /// Format a single dependency line
    fn format_dependency_line(
        &self,
        report: &DependencyReport<'_>,
        max_name_len: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let name = report.dependency.coordinate();
        let current = report.current_version().as_str();

        let Some(next) = report.next_version else {
            return if self.color {
                writeln!(
                    writer,
                    "  {} {}",
                    format!("{:width$}", name, width = max_name_len).dimmed(),
                    current.dimmed()
                )
            } else {
                writeln!(writer, "  {:width$} {}", name, current, width = max_name_len)
            };
        };

        let magnitude = report.smallest_difference;
        if self.color {
            writeln!(
                writer,
                "  {} {} {} {} [{}]",
                format!("{:width$}", name, width = max_name_len),
                current.dimmed(),
                "→".dimmed(),
                next.as_str().bright_white().bold(),
                colored_label(magnitude)
            )
        } else {
            writeln!(
                writer,
                "  {:width$} {} -> {} [{}]",
                name,
                current,
                next,
                magnitude.element_name(),
                width = max_name_len
            )
        }
    }

    /// Format the summary block
    fn format_summary(&self, report: &Report<'_>, writer: &mut dyn Write) -> std::io::Result<()> {
        let summary = &report.summary;
        let outdated = summary.outdated();
        let latest = summary.using_last_version;

        let mut parts = Vec::new();
        for magnitude in Magnitude::ALL {
            let count = summary.count(magnitude);
            if magnitude == Magnitude::Equal || count == 0 {
                continue;
            }
            let label = if magnitude == Magnitude::SubIncremental {
                "other"
            } else {
                magnitude.element_name()
            };
            if self.color {
                parts.push(format!("{} {}", count.to_string().bold(), label));
            } else {
                parts.push(format!("{} {}", count, label));
            }
        }

        if self.color {
            writeln!(writer, "{}:", "Summary".bold())?;
            if outdated > 0 {
                writeln!(
                    writer,
                    "  {} dependency(ies) with updates ({})",
                    outdated.to_string().green(),
                    parts.join(", ")
                )?;
            } else {
                writeln!(writer, "  {}", "No updates available".dimmed())?;
            }
            writeln!(
                writer,
                "  {} dependency(ies) using the latest version",
                latest.to_string().dimmed()
            )
        } else {
            writeln!(writer, "Summary:")?;
            if outdated > 0 {
                writeln!(
                    writer,
                    "  {} dependency(ies) with updates ({})",
                    outdated,
                    parts.join(", ")
                )?;
            } else {
                writeln!(writer, "  No updates available")?;
            }
            writeln!(writer, "  {} dependency(ies) using the latest version", latest)
        }
    }

    /// Format the whole report, mentioning where the report file was written
    pub fn format(
        &self,
        report: &Report<'_>,
        report_path: Option<&Path>,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let shown: Vec<&DependencyReport<'_>> = report
            .dependencies
            .iter()
            .filter(|d| self.verbose || d.next_version.is_some())
            .collect();
        let max_name_len = self.max_name_length(&shown).max(20);

        for dependency in &shown {
            self.format_dependency_line(dependency, max_name_len, writer)?;
        }
        if !shown.is_empty() {
            writeln!(writer)?;
        }

        self.format_summary(report, writer)?;

        if let Some(path) = report_path {
            let path = path.display().to_string();
            if self.color {
                writeln!(writer, "  Report written to {}", path.cyan())?;
            } else {
                writeln!(writer, "  Report written to {}", path)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures::sample_result;

    fn render(verbose: bool) -> String {
        let result = sample_result();
        let report = Report::new(&result).unwrap();
        let formatter = TextFormatter::with_color(verbose, false);
        let mut output = Vec::new();
        formatter
            .format(&report, Some(Path::new("target/report.xml")), &mut output)
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_text_formatter_new() {
        let formatter = TextFormatter::new(false);
        assert!(!formatter.verbose);
        assert!(formatter.color);
    }

    #[test]
    fn test_format_normal() {
        let output = render(false);
        assert!(output.contains("org.example:alpha"));
        assert!(output.contains("1.0.0 -> 1.0.1 [incremental]"));
        assert!(output.contains("1.0.0 -> 1.1.0 [minor]"));
        assert!(output.contains("1.0.0 -> 3.0.0 [major]"));
        assert!(output.contains("1.0.0 -> 1.0.0-1 [subincremental]"));
        assert!(!output.contains("org.example:delta"));
        assert!(output.contains("Summary:"));
        assert!(output.contains("4 dependency(ies) with updates (1 major, 1 minor, 1 incremental, 1 other)"));
        assert!(output.contains("1 dependency(ies) using the latest version"));
        assert!(output.contains("Report written to target/report.xml"));
    }

    #[test]
    fn test_format_verbose_lists_up_to_date() {
        let output = render(true);
        assert!(output.contains("org.example:delta"));
    }

    #[test]
    fn test_format_no_updates() {
        let result = crate::orchestrator::RetrievalResult::default();
        let report = Report::new(&result).unwrap();
        let mut output = Vec::new();
        TextFormatter::with_color(false, false)
            .format(&report, None, &mut output)
            .unwrap();
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("No updates available"));
        assert!(!output.contains("Report written"));
    }
}
