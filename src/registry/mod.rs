//! Version sources for published artifact versions
//!
//! This module provides:
//! - HTTP client shared foundation with retry logic
//! - Maven repository metadata adapter

mod client;
mod maven_repository;

pub use client::HttpClient;
pub use maven_repository::{parse_repository_url, MavenRepositoryAdapter, MAVEN_CENTRAL_URL};

use crate::domain::{Dependency, VersionTuple};
use crate::error::RegistryError;
use async_trait::async_trait;

/// Trait for sources of published versions
///
/// No ordering or uniqueness of the returned versions is assumed.
#[async_trait]
pub trait VersionSource: Send + Sync {
    /// Get the source name
    fn source_name(&self) -> &str;

    /// Fetch all published versions of a dependency's artifact
    async fn fetch_versions(
        &self,
        dependency: &Dependency,
    ) -> Result<Vec<VersionTuple>, RegistryError>;
}
