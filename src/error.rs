//! Application error types using thiserror
//!
//! Error hierarchy:
//! - PomError: Issues reading the project's pom.xml
//! - RegistryError: Issues with Maven repository communication
//! - ConfigError: Issues with CLI configuration
//! - UpdateError: A candidate version older than the current one reached classification
//! - ExhaustedError: A filtered sequence was advanced past its end
//! - RetrievalError: A retrieval run failed or was interrupted
//! - ReportError: The report could not be written

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::VersionField;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// pom.xml related errors
    #[error(transparent)]
    Pom(#[from] PomError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Repository client construction errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Update retrieval errors
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    /// Report output errors
    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Errors related to reading the project model
#[derive(Error, Debug)]
pub enum PomError {
    /// pom.xml not found
    #[error("pom.xml not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to read pom.xml
    #[error("failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// XML parsing error
    #[error("failed to parse XML in {path}: {message}")]
    XmlParseError { path: PathBuf, message: String },
}

/// Errors related to Maven repository communication
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Artifact metadata not found in a repository
    #[error("artifact '{artifact}' not found in {repository}")]
    ArtifactNotFound {
        artifact: String,
        repository: String,
    },

    /// Network request failed
    #[error("failed to fetch '{artifact}' from {repository}: {message}")]
    NetworkError {
        artifact: String,
        repository: String,
        message: String,
    },

    /// Rate limit exceeded
    #[error("rate limit exceeded for {repository}")]
    RateLimitExceeded { repository: String },

    /// Invalid response from repository
    #[error("invalid response from {repository} for '{artifact}': {message}")]
    InvalidResponse {
        artifact: String,
        repository: String,
        message: String,
    },

    /// Timeout
    #[error("timeout while fetching '{artifact}' from {repository}")]
    Timeout {
        artifact: String,
        repository: String,
    },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Worker count out of range
    #[error("invalid thread count {value}: at least one retrieval thread is required")]
    InvalidThreadCount { value: usize },

    /// Qualifier pattern does not compile
    #[error("invalid qualifier pattern '{pattern}': {message}")]
    InvalidQualifierPattern { pattern: String, message: String },

    /// Repository URL rejected
    #[error("invalid repository URL '{url}': {message}")]
    InvalidRepositoryUrl { url: String, message: String },
}

/// A candidate presumed newer compared as older than the current version
///
/// This signals a defect in filtering or in the version source, never a
/// condition to recover from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpdateError {
    #[error("{dependency}: {field} update version ({candidate}) less than current version ({current})")]
    InconsistentVersion {
        dependency: String,
        field: VersionField,
        candidate: u32,
        current: u32,
    },
}

/// Iteration advanced past the end of a filtered sequence
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("no more elements in filtered sequence")]
pub struct ExhaustedError;

/// Failure of the retrieval task for a single dependency
#[derive(Error, Debug)]
pub enum TaskError {
    /// The version source failed
    #[error(transparent)]
    Fetch(#[from] RegistryError),

    /// Classification found an inconsistent candidate
    #[error(transparent)]
    Inconsistent(#[from] UpdateError),

    /// The task panicked while checking the dependency
    #[error("task panicked: {message}")]
    Panicked { message: String },
}

/// Errors that end a retrieval run
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// A per-dependency task failed; no partial result is produced
    #[error("update retrieval was unsuccessful for {dependency}: {source}")]
    Failed {
        dependency: String,
        #[source]
        source: TaskError,
    },

    /// The caller interrupted the retrieval
    #[error("update retrieval was interrupted")]
    Interrupted,

    /// A worker panicked before reporting its result
    #[error("update retrieval worker failed: {message}")]
    WorkerPanicked { message: String },
}

/// Errors related to writing the report
#[derive(Error, Debug)]
pub enum ReportError {
    /// Failed to write the report file
    #[error("cannot create report {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize the report
    #[error("cannot serialize {format} report: {message}")]
    SerializeError {
        format: &'static str,
        message: String,
    },

    /// Classification failed while rendering
    #[error(transparent)]
    Inconsistent(#[from] UpdateError),
}

impl PomError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        PomError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PomError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new XmlParseError
    pub fn xml_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        PomError::XmlParseError {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl RegistryError {
    /// Creates a new ArtifactNotFound error
    pub fn artifact_not_found(artifact: impl Into<String>, repository: impl Into<String>) -> Self {
        RegistryError::ArtifactNotFound {
            artifact: artifact.into(),
            repository: repository.into(),
        }
    }

    /// Creates a new NetworkError
    pub fn network_error(
        artifact: impl Into<String>,
        repository: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::NetworkError {
            artifact: artifact.into(),
            repository: repository.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(
        artifact: impl Into<String>,
        repository: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::InvalidResponse {
            artifact: artifact.into(),
            repository: repository.into(),
            message: message.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(artifact: impl Into<String>, repository: impl Into<String>) -> Self {
        RegistryError::Timeout {
            artifact: artifact.into(),
            repository: repository.into(),
        }
    }

    /// Returns true if the artifact is simply not hosted by the repository
    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::ArtifactNotFound { .. })
    }
}

impl UpdateError {
    /// Creates a new InconsistentVersion error
    pub fn inconsistent(
        dependency: impl Into<String>,
        field: VersionField,
        candidate: u32,
        current: u32,
    ) -> Self {
        UpdateError::InconsistentVersion {
            dependency: dependency.into(),
            field,
            candidate,
            current,
        }
    }
}

impl RetrievalError {
    /// Creates a new Failed error for a dependency
    pub fn failed(dependency: impl Into<String>, source: impl Into<TaskError>) -> Self {
        RetrievalError::Failed {
            dependency: dependency.into(),
            source: source.into(),
        }
    }

    /// Returns the failing dependency, if a task failed
    pub fn dependency(&self) -> Option<&str> {
        match self {
            RetrievalError::Failed { dependency, .. } => Some(dependency),
            _ => None,
        }
    }
}

impl ReportError {
    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReportError::WriteError {
            path: path.into(),
            source,
        }
    }
}
