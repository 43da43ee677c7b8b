//! Validated run configuration built from the command line

use crate::cli::CliArgs;
use crate::error::ConfigError;
use crate::manifest::resolve_pom_path;
use crate::orchestrator::OrchestratorConfig;
use crate::output::OutputFormat;
use crate::registry::parse_repository_url;
use crate::update::QualifierPolicy;
use std::path::{Path, PathBuf};
use url::Url;

/// Directory the report lands in when no output file is given
pub const DEFAULT_OUTPUT_DIRECTORY: &str = "target";

/// Everything a report run needs, checked up front
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Path of the project's pom.xml
    pub pom_path: PathBuf,
    /// Orchestrator settings
    pub orchestrator: OrchestratorConfig,
    /// Qualifier acceptance policy
    pub policy: QualifierPolicy,
    /// Repositories to query; empty means Maven Central
    pub repositories: Vec<Url>,
    /// Report file
    pub output: PathBuf,
    /// Report format
    pub format: OutputFormat,
    /// Print the terminal summary
    pub show_summary: bool,
    /// Verbose terminal output
    pub verbose: bool,
}

impl ReportConfig {
    /// Create configuration from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Result<Self, ConfigError> {
        if args.threads == 0 {
            return Err(ConfigError::InvalidThreadCount {
                value: args.threads,
            });
        }

        let policy = QualifierPolicy::new(args.qualifier.as_str())?;
        let repositories = args
            .repositories
            .iter()
            .map(|url| parse_repository_url(url))
            .collect::<Result<Vec<_>, _>>()?;

        let pom_path = resolve_pom_path(&args.path);
        let output = match &args.output {
            Some(output) => output.clone(),
            None => default_output_path(&pom_path, args.format),
        };

        Ok(Self {
            pom_path,
            orchestrator: OrchestratorConfig {
                worker_count: args.threads,
            },
            policy,
            repositories,
            output,
            format: args.format,
            show_summary: !args.quiet,
            verbose: args.verbose,
        })
    }
}

/// `target/<report file>` next to the pom.xml
fn default_output_path(pom_path: &Path, format: OutputFormat) -> PathBuf {
    pom_path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(DEFAULT_OUTPUT_DIRECTORY)
        .join(format.default_file_name())
}
