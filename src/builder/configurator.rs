//! Binding convention flags and properties onto a module's tasks.
//!
//! The flag sequence of a module is `compiler_args` followed by the flags of
//! every enabled feature, in registration order. The same sequence is given
//! to both the compile task and the execute task: a preview feature compiled
//! in but not enabled at run time is a broken build, not a valid state.
//!
//! Configuration of a module moves through three states:
//!
//! ```text
//! Unconfigured --begin--> Configuring --finish--> Configured
//! ```
//!
//! Feature toggles can only change while `Configuring`. `finish` produces
//! every declared task config at once, or none of them.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::convention::ConventionDefinition;
use crate::core::errors::ConventionError;
use crate::core::feature::{FeatureFlagSet, FeatureFlagSetBuilder};
use crate::core::flag::FlagSequence;
use crate::core::module::ModuleSpec;
use crate::core::task::TaskKind;

use super::plan::{ModuleConfig, ResolvedTaskConfig};
use super::toolchain::Toolchain;

/// Configuration state of a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigState {
    Unconfigured,
    Configuring,
    Configured,
}

/// Per-module task configurator.
#[derive(Debug, Clone)]
pub struct TaskConfigurator {
    module: ModuleSpec,
    definition: Arc<ConventionDefinition>,
    state: ConfigState,
    features: Option<FeatureFlagSetBuilder>,
    resolved: Option<ModuleConfig>,
}

impl TaskConfigurator {
    /// Create a configurator applying `definition` to a module.
    pub fn new(module: ModuleSpec, definition: Arc<ConventionDefinition>) -> Self {
        TaskConfigurator {
            module,
            definition,
            state: ConfigState::Unconfigured,
            features: None,
            resolved: None,
        }
    }

    /// The module being configured.
    pub fn module(&self) -> &ModuleSpec {
        &self.module
    }


    /// Current state.
    pub fn state(&self) -> ConfigState {
        self.state
    }

    /// Enter the `Configuring` state.
    ///
    /// Toggles start from the convention's catalog defaults, then the
    /// module's own overrides from the manifest are applied.
    pub fn begin(&mut self) -> Result<(), ConventionError> {
        if self.state != ConfigState::Unconfigured {
            return Err(self.locked());
        }

        self.features = Some(self.module_features());
        self.state = ConfigState::Configuring;
        tracing::debug!(
            "configuring module `{}` with convention `{}`",
            self.module.id,
            self.definition.id()
        );
        Ok(())
    }

    /// Enable a feature toggle for this module.
    pub fn enable(&mut self, name: &str) -> Result<(), ConventionError> {
        self.features_mut()?.enable(name);
        Ok(())
    }

    /// Disable a feature toggle for this module.
    pub fn disable(&mut self, name: &str) -> Result<(), ConventionError> {
        self.features_mut()?.disable(name);
        Ok(())
    }

    /// Query a toggle. Every toggle reads as disabled before `begin`.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.features
            .as_ref()
            .is_some_and(|builder| builder.is_enabled(name))
    }

    /// The toggles the module is (or would be) configured with, including
    /// names the convention does not define. Before `begin` these are the
    /// catalog defaults with the module's overrides applied.
    pub fn feature_set(&self) -> FeatureFlagSet {
        match &self.features {
            Some(builder) => builder.clone().build(),
            None => self.module_features().build(),
        }
    }

    /// Produce the resolved config for a single task kind.
    ///
    /// This never changes the configurator. Once `Configured`, the frozen
    /// config for the kind is returned.
    pub fn configure(
        &self,
        toolchain: &Toolchain,
        kind: TaskKind,
    ) -> Result<ResolvedTaskConfig, ConventionError> {
        if let Some(resolved) = &self.resolved {
            return resolved
                .task(kind)
                .cloned()
                .ok_or_else(|| self.undeclared(kind));
        }

        resolve_task(&self.module, &self.definition, &self.feature_set(), toolchain, kind)
    }

    /// Resolve every declared task and enter the `Configured` state.
    ///
    /// On error the configurator stays in `Configuring` and nothing is
    /// published.
    pub fn finish(&mut self, toolchain: &Toolchain) -> Result<&ModuleConfig, ConventionError> {
        if self.state != ConfigState::Configuring {
            return Err(self.locked());
        }

        let features = self.feature_set();
        let definition = &self.definition;

        let mut tasks = BTreeMap::new();
        for kind in &self.module.tasks {
            let task = resolve_task(&self.module, definition, &features, toolchain, *kind)?;
            tasks.insert(*kind, task);
        }

        let config = ModuleConfig::assemble(
            self.module.binding(),
            definition.group().map(str::to_string),
            definition.version().map(str::to_string),
            definition.repositories().to_vec(),
            features.enabled_names(),
            tasks,
        )?;

        tracing::debug!(
            "module `{}` configured: {} task(s), fingerprint {}",
            self.module.id,
            config.tasks().len(),
            config.fingerprint()
        );

        self.state = ConfigState::Configured;
        Ok(self.resolved.insert(config))
    }

    /// The frozen module config, once `Configured`.
    pub fn resolved(&self) -> Option<&ModuleConfig> {
        self.resolved.as_ref()
    }

    /// Consume the configurator, yielding the frozen module config.
    pub fn into_resolved(self) -> Option<ModuleConfig> {
        self.resolved
    }

    fn module_features(&self) -> FeatureFlagSetBuilder {
        let mut builder = FeatureFlagSetBuilder::from_catalog(self.definition.features());
        for (name, enabled) in &self.module.features {
            builder.set(name, *enabled);
        }
        builder
    }

    fn features_mut(&mut self) -> Result<&mut FeatureFlagSetBuilder, ConventionError> {
        if self.state != ConfigState::Configuring {
            return Err(self.locked());
        }
        let subject = self.module.id.clone();
        self.features
            .as_mut()
            .ok_or_else(|| ConventionError::ConfigurationLocked {
                subject: subject.to_string(),
            })
    }

    fn locked(&self) -> ConventionError {
        ConventionError::ConfigurationLocked {
            subject: self.module.id.to_string(),
        }
    }

    fn undeclared(&self, kind: TaskKind) -> ConventionError {
        ConventionError::UndeclaredTask {
            module: self.module.id.to_string(),
            kind,
        }
    }
}

/// The flag sequence shared by the compile and execute tasks.
pub fn runtime_flags(definition: &ConventionDefinition, features: &FeatureFlagSet) -> FlagSequence {
    definition
        .compiler_args()
        .clone()
        .chain(&features.enabled_flags())
}

/// Resolve one task kind of a module.
pub fn resolve_task(
    module: &ModuleSpec,
    definition: &ConventionDefinition,
    features: &FeatureFlagSet,
    toolchain: &Toolchain,
    kind: TaskKind,
) -> Result<ResolvedTaskConfig, ConventionError> {
    if !module.declares(kind) {
        return Err(ConventionError::UndeclaredTask {
            module: module.id.to_string(),
            kind,
        });
    }

    let mut config = ResolvedTaskConfig::new(module.id.clone(), kind, definition, toolchain.clone());

    if kind.receives_flags() || definition.test_runtime_args() {
        config = config.with_flags(runtime_flags(definition, features));
    }

    if kind == TaskKind::Test {
        config = config.with_test_setup(definition);
    }

    Ok(config)
}
