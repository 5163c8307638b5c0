//! Berth - build convention resolution for multi-module JVM projects
//!
//! This crate resolves named build conventions (language version, compiler
//! and runtime flags, preview features, test setup) into per-module task
//! configurations and an immutable build plan.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities for Berth unit tests.
///
/// Only available when compiling tests.
#[cfg(test)]
pub mod test_support;

pub use crate::builder::{BuildPlan, ConfigurationContext, ModuleConfig, ResolvedTaskConfig};
pub use crate::core::{ConventionDefinition, ConventionError, ConventionRegistry, Manifest};
pub use crate::util::context::GlobalContext;
