//! Project model reading
//!
//! This module provides functionality to:
//! - Locate the project's pom.xml
//! - Read its declared dependencies with their selected versions

mod pom;

pub use pom::{resolve_pom_path, PomProject, DEFAULT_SCOPE, POM_FILE};
