//! pom.xml reader
//!
//! Handles:
//! - Declared `<dependencies>` of the project
//! - `<properties>` and `${project.*}` / `${project.parent.*}` references
//! - Versions and scopes supplied by `<dependencyManagement>`
//!
//! Dependencies without a single resolvable version (ranges, unknown
//! properties) are skipped with a warning.

use crate::domain::{Dependency, DEFAULT_TYPE};
use crate::error::PomError;
use quick_xml::de::from_str;
use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Project model file name
pub const POM_FILE: &str = "pom.xml";

/// Scope of a dependency that declares none
pub const DEFAULT_SCOPE: &str = "compile";

/// Nested property resolution limit
const MAX_INTERPOLATION_DEPTH: usize = 10;

// Property reference: ${name}
static PROPERTY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProject {
    group_id: Option<String>,
    artifact_id: Option<String>,
    version: Option<String>,
    parent: Option<RawParent>,
    #[serde(default)]
    properties: HashMap<String, String>,
    dependency_management: Option<RawDependencyManagement>,
    dependencies: Option<RawDependencies>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawParent {
    group_id: Option<String>,
    version: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawDependencyManagement {
    dependencies: Option<RawDependencies>,
}

#[derive(Debug, Default, Deserialize)]
struct RawDependencies {
    #[serde(default, rename = "dependency")]
    dependency: Vec<RawDependency>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDependency {
    group_id: Option<String>,
    artifact_id: Option<String>,
    version: Option<String>,
    #[serde(rename = "type")]
    packaging: Option<String>,
    classifier: Option<String>,
    scope: Option<String>,
}

/// A project read from pom.xml
#[derive(Debug, Clone, Default)]
pub struct PomProject {
    /// Project groupId (inherited from the parent when absent)
    pub group_id: Option<String>,
    /// Project artifactId
    pub artifact_id: Option<String>,
    /// Project version (inherited from the parent when absent)
    pub version: Option<String>,
    /// Declared dependencies with a resolved version
    pub dependencies: BTreeSet<Dependency>,
}

/// Returns the pom.xml path for a file or project directory
pub fn resolve_pom_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(POM_FILE)
    } else {
        path.to_path_buf()
    }
}

impl PomProject {
    /// Read the project at `path` (a pom.xml file or its directory)
    pub fn read(path: &Path) -> Result<Self, PomError> {
        let path = resolve_pom_path(path);
        if !path.is_file() {
            return Err(PomError::not_found(path));
        }
        let content =
            std::fs::read_to_string(&path).map_err(|e| PomError::read_error(&path, e))?;
        Self::parse(&content, &path)
    }

    /// Parse pom.xml content; `path` is used for error messages
    pub fn parse(content: &str, path: &Path) -> Result<Self, PomError> {
        let raw: RawProject =
            from_str(content).map_err(|e| PomError::xml_parse_error(path, e.to_string()))?;

        let interpolator = Interpolator::new(&raw);
        let managed = managed_dependencies(&raw, &interpolator);

        let mut dependencies = BTreeSet::new();
        let declared = raw
            .dependencies
            .as_ref()
            .map(|d| d.dependency.as_slice())
            .unwrap_or_default();

        for declared in declared {
            if let Some(dependency) = resolve_dependency(declared, &managed, &interpolator) {
                debug!(dependency = %dependency, "declared dependency");
                if !dependencies.insert(dependency) {
                    warn!(
                        artifact = declared.artifact_id.as_deref().unwrap_or_default(),
                        "duplicate dependency declaration ignored"
                    );
                }
            }
        }

        Ok(Self {
            group_id: interpolator.project_group_id.clone(),
            artifact_id: raw.artifact_id.as_deref().map(|a| a.trim().to_string()),
            version: interpolator.project_version.clone(),
            dependencies,
        })
    }

    /// `groupId:artifactId:version` of the project, as far as known
    pub fn name(&self) -> String {
        [&self.group_id, &self.artifact_id, &self.version]
            .iter()
            .map(|part| part.as_deref().unwrap_or("?"))
            .collect::<Vec<_>>()
            .join(":")
    }
}

/// Key matching a declared dependency with its managed counterpart
type ManagementKey = (String, String, String, Option<String>);

fn management_key(
    group_id: &str,
    artifact_id: &str,
    packaging: &str,
    classifier: Option<&str>,
) -> ManagementKey {
    (
        group_id.to_string(),
        artifact_id.to_string(),
        packaging.to_string(),
        classifier.map(str::to_string),
    )
}

fn managed_dependencies(
    raw: &RawProject,
    interpolator: &Interpolator,
) -> HashMap<ManagementKey, RawDependency> {
    raw.dependency_management
        .as_ref()
        .and_then(|m| m.dependencies.as_ref())
        .map(|d| d.dependency.as_slice())
        .unwrap_or_default()
        .iter()
        .filter_map(|managed| {
            let group_id = interpolator.resolve(managed.group_id.as_deref()?)?;
            let artifact_id = interpolator.resolve(managed.artifact_id.as_deref()?)?;
            let packaging = managed.packaging.as_deref().unwrap_or(DEFAULT_TYPE).trim();
            let classifier = managed.classifier.as_deref().map(str::trim);
            Some((
                management_key(&group_id, &artifact_id, packaging, classifier),
                managed.clone(),
            ))
        })
        .collect()
}

fn resolve_dependency(
    declared: &RawDependency,
    managed: &HashMap<ManagementKey, RawDependency>,
    interpolator: &Interpolator,
) -> Option<Dependency> {
    let (Some(group_id), Some(artifact_id)) = (
        declared.group_id.as_deref().and_then(|g| interpolator.resolve(g)),
        declared.artifact_id.as_deref().and_then(|a| interpolator.resolve(a)),
    ) else {
        warn!("dependency without resolvable groupId/artifactId skipped");
        return None;
    };

    let packaging = declared
        .packaging
        .as_deref()
        .and_then(|t| interpolator.resolve(t))
        .unwrap_or_else(|| DEFAULT_TYPE.to_string());
    let classifier = declared
        .classifier
        .as_deref()
        .and_then(|c| interpolator.resolve(c))
        .filter(|c| !c.is_empty());
    let management =
        managed.get(&management_key(&group_id, &artifact_id, &packaging, classifier.as_deref()));

    let coordinate = format!("{}:{}", group_id, artifact_id);
    let Some(raw_version) = declared
        .version
        .as_deref()
        .or_else(|| management.and_then(|m| m.version.as_deref()))
    else {
        warn!(dependency = %coordinate, "no version declared or managed, skipped");
        return None;
    };

    let Some(version) = interpolator.resolve(raw_version) else {
        warn!(
            dependency = %coordinate,
            version = raw_version.trim(),
            "unresolvable version property, skipped"
        );
        return None;
    };
    if version.is_empty() || version.starts_with('[') || version.starts_with('(') {
        warn!(dependency = %coordinate, version = %version, "version range, skipped");
        return None;
    }

    let scope = declared
        .scope
        .as_deref()
        .or_else(|| management.and_then(|m| m.scope.as_deref()))
        .and_then(|s| interpolator.resolve(s))
        .unwrap_or_else(|| DEFAULT_SCOPE.to_string());

    let mut dependency = Dependency::new(group_id, artifact_id, version.as_str())
        .with_type(packaging)
        .with_scope(scope);
    if let Some(classifier) = classifier {
        dependency = dependency.with_classifier(classifier);
    }
    Some(dependency)
}

/// Resolves `${...}` references against the project model and its properties
struct Interpolator {
    project_group_id: Option<String>,
    project_artifact_id: Option<String>,
    project_version: Option<String>,
    parent_group_id: Option<String>,
    parent_version: Option<String>,
    properties: HashMap<String, String>,
}

impl Interpolator {
    fn new(raw: &RawProject) -> Self {
        let trimmed = |value: &Option<String>| value.as_deref().map(|v| v.trim().to_string());
        let parent_group_id = raw.parent.as_ref().and_then(|p| trimmed(&p.group_id));
        let parent_version = raw.parent.as_ref().and_then(|p| trimmed(&p.version));

        let mut interpolator = Self {
            project_group_id: trimmed(&raw.group_id).or_else(|| parent_group_id.clone()),
            project_artifact_id: trimmed(&raw.artifact_id),
            project_version: trimmed(&raw.version).or_else(|| parent_version.clone()),
            parent_group_id,
            parent_version,
            properties: raw
                .properties
                .iter()
                .map(|(k, v)| (k.clone(), v.trim().to_string()))
                .collect(),
        };
        // the project version itself may reference properties (e.g. ${revision})
        interpolator.project_version = interpolator
            .project_version
            .as_deref()
            .map(|v| interpolator.resolve(v).unwrap_or_else(|| v.to_string()));
        interpolator
    }

    fn lookup(&self, name: &str) -> Option<&str> {
        match name {
            "project.groupId" | "pom.groupId" => self.project_group_id.as_deref(),
            "project.artifactId" | "pom.artifactId" => self.project_artifact_id.as_deref(),
            "project.version" | "pom.version" | "version" => self.project_version.as_deref(),
            "project.parent.groupId" => self.parent_group_id.as_deref(),
            "project.parent.version" => self.parent_version.as_deref(),
            _ => self.properties.get(name).map(String::as_str),
        }
    }

    /// Resolve every reference in `text`; `None` if any reference is unknown
    fn resolve(&self, text: &str) -> Option<String> {
        let mut current = text.trim().to_string();
        for _ in 0..MAX_INTERPOLATION_DEPTH {
            if !PROPERTY_RE.is_match(&current) {
                return Some(current);
            }
            let mut unknown = false;
            let next = PROPERTY_RE.replace_all(&current, |caps: &regex::Captures| {
                match self.lookup(&caps[1]) {
                    Some(value) => value.to_string(),
                    None => {
                        unknown = true;
                        String::new()
                    }
                }
            });
            if unknown {
                return None;
            }
            current = next.into_owned();
        }
        None
    }
}
