//! Core domain models for mvn-updates
//!
//! This module contains the fundamental types used throughout the application:
//! - Maven version tuples and their ordering
//! - Magnitude of the difference between two versions
//! - Dependency identity with the currently selected version
//! - Summary counts by magnitude

mod dependency;
mod magnitude;
mod summary;
mod version;

pub use dependency::{Dependency, DEFAULT_TYPE};
pub use magnitude::Magnitude;
pub use summary::UpdateSummary;
pub use version::{VersionField, VersionTuple};
