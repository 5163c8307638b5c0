//! Module configuration.
//!
//! This module turns bound modules into resolved task configurations:
//! toolchain selection, the per-module configurator and the build plan.

pub mod configurator;
pub mod context;
pub mod plan;
pub mod toolchain;

pub use configurator::{ConfigState, TaskConfigurator};
pub use context::ConfigurationContext;
pub use plan::{BuildPlan, ModuleConfig, ResolvedTaskConfig};
pub use toolchain::{
    detect_selector, Toolchain, ToolchainOrigin, ToolchainProvider, ToolchainSelector,
};
