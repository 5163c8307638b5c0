//! Core data structures for Berth.
//!
//! This module contains the foundational types used throughout Berth:
//! - Flag tokens and ordered flag sequences
//! - Dependency coordinates
//! - Convention definitions, feature toggles and the registry
//! - Module declarations and the manifest

pub mod convention;
pub mod coordinate;
pub mod errors;
pub mod feature;
pub mod flag;
pub mod manifest;
pub mod module;
pub mod registry;
pub mod task;

pub use convention::{ConventionDefinition, LanguageVersion};
pub use coordinate::Coordinate;
pub use errors::ConventionError;
pub use feature::{FeatureDefinition, FeatureFlagSet, FeatureFlagSetBuilder};
pub use flag::{FlagSequence, FlagToken};
pub use manifest::{Manifest, MANIFEST_NAME};
pub use module::{ModuleSpec, ProjectBinding};
pub use registry::ConventionRegistry;
pub use task::TaskKind;
