//! Dependency information structures

use super::VersionTuple;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Default packaging type of a Maven dependency
pub const DEFAULT_TYPE: &str = "jar";

/// A declared dependency with its currently selected version
///
/// Equality, ordering and hashing use the identity fields only
/// (group, artifact, classifier, type, scope), never the version.
#[derive(Debug, Clone)]
pub struct Dependency {
    /// Maven groupId
    pub group_id: String,
    /// Maven artifactId
    pub artifact_id: String,
    /// Optional classifier (e.g. `sources`, `jdk8`)
    pub classifier: Option<String>,
    /// Packaging type (`jar` unless declared otherwise)
    pub packaging: String,
    /// Dependency scope (`compile`, `test`, ...)
    pub scope: Option<String>,
    version: VersionTuple,
}

impl Dependency {
    /// Creates a new dependency with default type and no classifier or scope
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<VersionTuple>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            classifier: None,
            packaging: DEFAULT_TYPE.to_string(),
            scope: None,
            version: version.into(),
        }
    }

    /// Sets the classifier (builder pattern)
    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    /// Sets the packaging type (builder pattern)
    pub fn with_type(mut self, packaging: impl Into<String>) -> Self {
        self.packaging = packaging.into();
        self
    }

    /// Sets the scope (builder pattern)
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Returns the currently selected version
    pub fn version(&self) -> &VersionTuple {
        &self.version
    }

    /// Returns `groupId:artifactId`
    pub fn coordinate(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }

    fn identity(&self) -> (&str, &str, Option<&str>, &str, Option<&str>) {
        (
            &self.group_id,
            &self.artifact_id,
            self.classifier.as_deref(),
            &self.packaging,
            self.scope.as_deref(),
        )
    }
}

impl PartialEq for Dependency {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Dependency {}

impl Ord for Dependency {
    fn cmp(&self, other: &Self) -> Ordering {
        self.identity().cmp(&other.identity())
    }
}

impl PartialOrd for Dependency {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for Dependency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.packaging)?;
        if let Some(classifier) = &self.classifier {
            write!(f, ":{}", classifier)?;
        }
        write!(f, ":{}", self.version)?;
        if let Some(scope) = &self.scope {
            write!(f, ":{}", scope)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_dependency_new() {
        let dep = Dependency::new("org.slf4j", "slf4j-api", "2.0.9");
        assert_eq!(dep.group_id, "org.slf4j");
        assert_eq!(dep.artifact_id, "slf4j-api");
        assert_eq!(dep.packaging, "jar");
        assert!(dep.classifier.is_none());
        assert!(dep.scope.is_none());
        assert_eq!(dep.version().as_str(), "2.0.9");
    }

    #[test]
    fn test_dependency_builders() {
        let dep = Dependency::new("org.example", "lib", "1.0")
            .with_classifier("tests")
            .with_type("test-jar")
            .with_scope("test");
        assert_eq!(dep.classifier.as_deref(), Some("tests"));
        assert_eq!(dep.packaging, "test-jar");
        assert_eq!(dep.scope.as_deref(), Some("test"));
    }

    #[test]
    fn test_equality_ignores_version() {
        let a = Dependency::new("org.example", "lib", "1.0");
        let b = Dependency::new("org.example", "lib", "2.0");
        assert_eq!(a, b);
    }

    #[test]
    fn test_equality_uses_scope_and_classifier() {
        let base = Dependency::new("org.example", "lib", "1.0");
        assert_ne!(base.clone(), base.clone().with_scope("test"));
        assert_ne!(base.clone(), base.clone().with_classifier("sources"));
    }

    #[test]
    fn test_ordering_by_identity() {
        let set: BTreeSet<Dependency> = [
            Dependency::new("org.b", "x", "9.0"),
            Dependency::new("org.a", "z", "1.0"),
            Dependency::new("org.a", "y", "5.0"),
        ]
        .into_iter()
        .collect();

        let ordered: Vec<String> = set.iter().map(Dependency::coordinate).collect();
        assert_eq!(ordered, vec!["org.a:y", "org.a:z", "org.b:x"]);
    }

    #[test]
    fn test_dependency_display() {
        let dep = Dependency::new("junit", "junit", "4.13.2").with_scope("test");
        assert_eq!(dep.to_string(), "junit:junit:jar:4.13.2:test");

        let dep = Dependency::new("org.example", "lib", "1.0").with_classifier("jdk8");
        assert_eq!(dep.to_string(), "org.example:lib:jar:jdk8:1.0");
    }
}
