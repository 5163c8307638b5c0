//! Test utilities for Berth unit tests.
//!
//! Builders for conventions and toolchains, plus a provider that counts how
//! often it is asked for toolchains.

pub mod fixtures;

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::builder::toolchain::{Toolchain, ToolchainOrigin, ToolchainProvider};
use crate::core::convention::{ConventionDefinition, LanguageVersion};
use crate::core::coordinate::Coordinate;
use crate::core::feature::FeatureDefinition;
use crate::core::flag::FlagSequence;

pub use fixtures::*;

/// A valid language version.
pub fn version(v: u32) -> LanguageVersion {
    LanguageVersion::new(i64::from(v), "test").unwrap()
}

/// A flag sequence from string tokens.
pub fn seq(tokens: &[&str]) -> FlagSequence {
    tokens.iter().copied().collect()
}

/// A bare convention with no flags.
pub fn convention(id: &str, v: u32) -> ConventionDefinition {
    ConventionDefinition::builder(id, version(v)).build().unwrap()
}

/// The `java-lib` convention: `--enable-preview` and nothing else.
pub fn java_lib(v: u32) -> ConventionDefinition {
    ConventionDefinition::builder("java-lib", version(v))
        .compiler_args(seq(&["--enable-preview"]))
        .build()
        .unwrap()
}

/// `java-lib` with a disabled `incubator` toggle adding `--add-modules X`,
/// plus the JUnit test setup.
pub fn java_lib_with_incubator(v: u32) -> ConventionDefinition {
    ConventionDefinition::builder("java-lib", version(v))
        .compiler_args(seq(&["--enable-preview"]))
        .feature(FeatureDefinition::new("incubator", seq(&["--add-modules", "X"])))
        .test_dependency(Coordinate::new("org.junit.jupiter", "junit-jupiter", "5.9.1").unwrap())
        .test_dependency(Coordinate::new("org.assertj", "assertj-core", "3.23.1").unwrap())
        .test_system_property("junit.jupiter.testinstance.lifecycle.default", "per_class")
        .test_engine("junit-platform")
        .build()
        .unwrap()
}

/// A config-declared toolchain at `/opt/jdk-<v>`.
pub fn toolchain(v: u32) -> Toolchain {
    Toolchain::new(version(v), PathBuf::from(format!("/opt/jdk-{}", v)), ToolchainOrigin::Config)
}

/// Provider that records how many times it was queried.
#[derive(Debug, Clone)]
pub struct CountingProvider {
    toolchains: Vec<Toolchain>,
    calls: Arc<AtomicUsize>,
}

impl CountingProvider {
    pub fn new(toolchains: Vec<Toolchain>) -> Self {
        CountingProvider {
            toolchains,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared call counter; stays valid after the provider is moved.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl ToolchainProvider for CountingProvider {
    fn name(&self) -> &str {
        "counting"
    }

    fn toolchains(&self) -> Vec<Toolchain> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.toolchains.clone()
    }
}
