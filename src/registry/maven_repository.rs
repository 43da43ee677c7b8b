//! Maven repository metadata adapter
//!
//! Fetches the published versions of an artifact from the
//! `maven-metadata.xml` file of each configured repository.
//!
//! URL format: {repository}/{groupId with '.' replaced by '/'}/{artifactId}/maven-metadata.xml

use crate::domain::{Dependency, VersionTuple};
use crate::error::{ConfigError, RegistryError};
use crate::registry::{HttpClient, VersionSource};
use async_trait::async_trait;
use quick_xml::de::from_str;
use serde::Deserialize;
use tracing::debug;
use url::Url;

/// Maven Central repository URL
pub const MAVEN_CENTRAL_URL: &str = "https://repo1.maven.org/maven2";

/// Largest metadata document accepted
const MAX_METADATA_BYTES: usize = 10 * 1024 * 1024;

/// Version source reading Maven repository metadata
pub struct MavenRepositoryAdapter {
    client: HttpClient,
    repositories: Vec<Url>,
}

/// maven-metadata.xml document
#[derive(Debug, Deserialize)]
struct MavenMetadata {
    #[serde(default)]
    versioning: Versioning,
}

#[derive(Debug, Default, Deserialize)]
struct Versioning {
    #[serde(default)]
    versions: Versions,
}

#[derive(Debug, Default, Deserialize)]
struct Versions {
    #[serde(default)]
    version: Vec<String>,
}

/// Parse and validate a repository base URL (http or https only)
pub fn parse_repository_url(url: &str) -> Result<Url, ConfigError> {
    let parsed = Url::parse(url).map_err(|e| ConfigError::InvalidRepositoryUrl {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    match parsed.scheme() {
        "https" | "http" => Ok(parsed),
        scheme => Err(ConfigError::InvalidRepositoryUrl {
            url: url.to_string(),
            message: format!("unsupported scheme '{}'", scheme),
        }),
    }
}

impl MavenRepositoryAdapter {
    /// Create an adapter reading from Maven Central only
    pub fn new(client: HttpClient) -> Self {
        Self::with_repositories(client, Vec::new())
    }

    /// Create an adapter reading from the given repositories, in order.
    /// An empty list means Maven Central.
    pub fn with_repositories(client: HttpClient, repositories: Vec<Url>) -> Self {
        let repositories = if repositories.is_empty() {
            Url::parse(MAVEN_CENTRAL_URL).into_iter().collect()
        } else {
            repositories
        };
        Self {
            client,
            repositories,
        }
    }

    /// Configured repositories
    pub fn repositories(&self) -> &[Url] {
        &self.repositories
    }

    /// Metadata URL of `dependency` in `repository`
    fn metadata_url(repository: &Url, dependency: &Dependency) -> String {
        format!(
            "{}/{}/{}/maven-metadata.xml",
            repository.as_str().trim_end_matches('/'),
            dependency.group_id.replace('.', "/"),
            dependency.artifact_id
        )
    }

    /// Extract the version list from a metadata document
    fn parse_metadata(
        text: &str,
        artifact: &str,
        repository: &str,
    ) -> Result<Vec<String>, RegistryError> {
        if text.len() > MAX_METADATA_BYTES {
            return Err(RegistryError::invalid_response(
                artifact,
                repository,
                "metadata exceeds 10MB limit",
            ));
        }

        let metadata: MavenMetadata = from_str(text).map_err(|e| {
            RegistryError::invalid_response(
                artifact,
                repository,
                format!("failed to parse maven-metadata.xml: {}", e),
            )
        })?;

        Ok(metadata.versioning.versions.version)
    }

    async fn fetch_from(
        &self,
        repository: &Url,
        dependency: &Dependency,
    ) -> Result<Vec<String>, RegistryError> {
        let url = Self::metadata_url(repository, dependency);
        let artifact = dependency.coordinate();
        let text = self
            .client
            .get_text(&url, &artifact, repository.as_str())
            .await?;
        Self::parse_metadata(&text, &artifact, repository.as_str())
    }
}

#[async_trait]
impl VersionSource for MavenRepositoryAdapter {
    fn source_name(&self) -> &str {
        "Maven repository"
    }

    async fn fetch_versions(
        &self,
        dependency: &Dependency,
    ) -> Result<Vec<VersionTuple>, RegistryError> {
        let mut versions = Vec::new();

        for repository in &self.repositories {
            match self.fetch_from(repository, dependency).await {
                Ok(found) => {
                    debug!(
                        dependency = %dependency.coordinate(),
                        repository = %repository,
                        count = found.len(),
                        "fetched versions"
                    );
                    versions.extend(found.iter().map(|v| VersionTuple::parse(v.trim())));
                }
                Err(e) if e.is_not_found() => {
                    debug!(
                        dependency = %dependency.coordinate(),
                        repository = %repository,
                        "artifact not hosted"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Ok(versions)
    }
}
