//! CLI argument parsing module for mvn-updates

use crate::orchestrator::DEFAULT_WORKER_COUNT;
use crate::output::OutputFormat;
use crate::update::DEFAULT_QUALIFIER_PATTERN;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Parse report format: xml or json
fn parse_output_format(s: &str) -> Result<OutputFormat, String> {
    s.parse()
}

/// Report available updates for the dependencies of a Maven project
#[derive(Parser, Debug, Clone)]
#[command(
    name = "mvn-updates",
    version,
    about = "Report available updates for the dependencies of a Maven project"
)]
pub struct CliArgs {
    /// Project directory or pom.xml (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    // Retrieval options
    /// Number of concurrent retrieval threads
    #[arg(long, default_value_t = DEFAULT_WORKER_COUNT)]
    pub threads: usize,

    /// Regular expression a version qualifier must fully match to be reported
    #[arg(long, default_value = DEFAULT_QUALIFIER_PATTERN)]
    pub qualifier: String,

    /// Maven repository to query (can be specified multiple times, default: Maven Central)
    #[arg(long = "repository", action = ArgAction::Append)]
    pub repositories: Vec<String>,

    // Output options
    /// Report file (default: target/dependency-updates-report.<format>)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report format: xml or json
    #[arg(long, value_parser = parse_output_format, default_value = "xml")]
    pub format: OutputFormat,

    /// Skip the update report entirely
    #[arg(long)]
    pub skip: bool,

    // General options
    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - no terminal summary
    #[arg(short, long)]
    pub quiet: bool,
}
