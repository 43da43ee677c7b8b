//! mvn-updates - Maven dependency update report library
//!
//! This library provides the core functionality for reporting which newer
//! versions of a Maven project's dependencies are published:
//! - Reading declared dependencies from pom.xml
//! - Fetching published versions from Maven repositories concurrently
//! - Classifying each update as major, minor, incremental or sub-incremental
//! - Rendering XML or JSON reports and a terminal summary

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod progress;
pub mod registry;
pub mod update;
