//! Implementation of `berth plan` and `berth flags`.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::builder::{detect_selector, BuildPlan, ConfigurationContext, ResolvedTaskConfig};
use crate::core::errors::ConventionError;
use crate::core::manifest::Manifest;
use crate::core::task::TaskKind;
use crate::util::config::ToolchainConfig;
use crate::util::fs::write_atomic;
use crate::util::GlobalContext;

/// A loaded project: its manifest and merged toolchain configuration.
#[derive(Debug, Clone)]
pub struct Project {
    pub manifest_path: PathBuf,
    pub root: PathBuf,
    pub manifest: Manifest,
    pub toolchains: ToolchainConfig,
}

impl Project {
    /// Locate and load the project for a global context.
    pub fn load(gctx: &GlobalContext) -> Result<Self> {
        let manifest_path = gctx.find_manifest()?;
        let manifest = Manifest::load(&manifest_path)?;
        let root = manifest.manifest_dir.clone();
        let toolchains = gctx.toolchain_config(&root)?;

        tracing::debug!(
            "loaded {} with {} convention(s) and {} module(s)",
            manifest_path.display(),
            manifest.conventions.len(),
            manifest.modules.len()
        );

        Ok(Project {
            manifest_path,
            root,
            manifest,
            toolchains,
        })
    }

    /// Build a fresh configuration context for this project.
    pub fn configuration_context(&self) -> Result<ConfigurationContext> {
        let selector = detect_selector(&self.toolchains);
        Ok(ConfigurationContext::from_manifest(&self.manifest, selector)?)
    }
}

/// Options for the plan command.
#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    /// Write the JSON plan to this file
    pub output: Option<PathBuf>,
}

/// Resolve every module of the project into a build plan.
pub fn plan(gctx: &GlobalContext, opts: &PlanOptions) -> Result<BuildPlan> {
    let project = Project::load(gctx)?;
    let mut cx = project.configuration_context()?;
    let plan = cx.build_plan()?;

    if let Some(ref output) = opts.output {
        write_plan(&plan, output)?;
        tracing::info!("Wrote build plan to {}", output.display());
    }

    Ok(plan)
}

/// Write a plan as JSON.
pub fn write_plan(plan: &BuildPlan, path: &Path) -> Result<()> {
    let mut json = plan.to_json()?;
    json.push('\n');
    write_atomic(path, &json)
}

/// Resolve a single module's task configs.
///
/// With `kind`, only that task is returned; it must be declared by the module.
pub fn module_flags(
    gctx: &GlobalContext,
    module: &str,
    kind: Option<TaskKind>,
) -> Result<Vec<ResolvedTaskConfig>> {
    let project = Project::load(gctx)?;
    let mut cx = project.configuration_context()?;
    let config = cx.configure_module(module)?;

    match kind {
        Some(kind) => match config.task(kind) {
            Some(task) => Ok(vec![task.clone()]),
            None => Err(ConventionError::UndeclaredTask {
                module: module.to_string(),
                kind,
            }
            .into()),
        },
        None => Ok(config.tasks().values().cloned().collect()),
    }
}
