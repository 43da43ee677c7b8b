//! Update classification for dependencies
//!
//! This module provides:
//! - Magnitude classification of a candidate against the selected version
//! - A lazily filtered sequence used to isolate acceptable candidates
//! - The per-dependency update set indexed by magnitude
//! - Acceptance policies deciding which candidates count as updates

mod classify;
mod filtered;
mod policy;
mod update_set;

pub use classify::classify;
pub use filtered::FilteredSequence;
pub use policy::{
    is_acceptable_update, AcceptAll, AcceptancePolicy, QualifierPolicy, DEFAULT_QUALIFIER_PATTERN,
};
pub use update_set::{Classification, Classified, UpdateSet};
