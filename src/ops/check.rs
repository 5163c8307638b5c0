//! Implementation of `berth check`.
//!
//! Unlike `plan`, which stops at the first failure, `check` configures every
//! module independently and reports each outcome, plus feature overrides that
//! name toggles the bound convention does not define.

use std::path::PathBuf;

use anyhow::Result;

use crate::builder::TaskConfigurator;
use crate::core::errors::ConventionError;
use crate::ops::berth_plan::Project;
use crate::util::{GlobalContext, Name};

/// Outcome of configuring one module.
#[derive(Debug, Clone)]
pub struct ModuleCheck {
    pub module: Name,
    pub convention: Name,
    /// Module fingerprint on success
    pub result: Result<String, ConventionError>,
    /// Feature overrides the convention does not define
    pub unknown_features: Vec<String>,
}

impl ModuleCheck {
    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }
}

/// Result of checking a project.
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub manifest_path: PathBuf,
    pub conventions: usize,
    pub modules: Vec<ModuleCheck>,
}

impl CheckReport {
    /// True if every module configured.
    pub fn passed(&self) -> bool {
        self.modules.iter().all(ModuleCheck::passed)
    }

    /// Number of failing modules.
    pub fn failures(&self) -> usize {
        self.modules.iter().filter(|m| !m.passed()).count()
    }
}

/// Check the project's manifest and toolchains.
///
/// Registry population errors (duplicates, stale supersedes) are fatal and
/// returned as errors; per-module errors are collected in the report.
pub fn check(gctx: &GlobalContext) -> Result<CheckReport> {
    let project = Project::load(gctx)?;
    let mut cx = project.configuration_context()?;

    let mut report = CheckReport {
        manifest_path: project.manifest_path.clone(),
        conventions: cx.registry().len(),
        modules: Vec::new(),
    };

    for id in cx.module_ids() {
        let Some(module) = cx.binding(&id).cloned() else {
            continue;
        };

        let unknown_features = match cx.registry().resolve(&module.convention) {
            Ok(def) => TaskConfigurator::new(module.clone(), def)
                .feature_set()
                .unknown_names()
                .iter()
                .map(|name| name.to_string())
                .collect(),
            Err(_) => Vec::new(),
        };

        let result = cx
            .configure_module(&id)
            .map(|config| config.fingerprint().to_string());

        match result {
            Ok(ref fp) => tracing::debug!("module `{}` ok ({})", id, fp),
            Err(ref e) => tracing::debug!("module `{}` failed: {}", id, e),
        }

        report.modules.push(ModuleCheck {
            module: id,
            convention: module.convention,
            result,
            unknown_features,
        });
    }

    Ok(report)
}
