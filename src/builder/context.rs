//! Configuration context - registry, toolchains, and module bindings.
//!
//! A [`ConfigurationContext`] owns everything one configuration pass needs:
//! the frozen convention registry, the toolchain selector and the declared
//! modules. There is no global state; two contexts never observe each other.

use std::collections::BTreeMap;
use std::fmt;

use crate::core::errors::ConventionError;
use crate::core::manifest::Manifest;
use crate::core::module::ModuleSpec;
use crate::core::registry::ConventionRegistry;
use crate::util::Name;

use super::configurator::TaskConfigurator;
use super::plan::{BuildPlan, ModuleConfig};
use super::toolchain::ToolchainSelector;

/// Owner of a configuration pass.
pub struct ConfigurationContext {
    registry: ConventionRegistry,
    selector: ToolchainSelector,
    bindings: BTreeMap<Name, ModuleSpec>,
    configured: BTreeMap<Name, ModuleConfig>,
}

impl ConfigurationContext {
    /// Create a context. The registry is frozen if it wasn't already.
    pub fn new(mut registry: ConventionRegistry, selector: ToolchainSelector) -> Self {
        if !registry.is_frozen() {
            tracing::debug!("freezing convention registry with {} convention(s)", registry.len());
            registry.freeze();
        }
        ConfigurationContext {
            registry,
            selector,
            bindings: BTreeMap::new(),
            configured: BTreeMap::new(),
        }
    }

    /// Create a context from a manifest: its conventions populate the
    /// registry and its modules are bound in declaration order.
    pub fn from_manifest(
        manifest: &Manifest,
        selector: ToolchainSelector,
    ) -> Result<Self, ConventionError> {
        let registry = manifest.populate_registry()?;
        let mut cx = ConfigurationContext::new(registry, selector);
        for module in &manifest.modules {
            cx.bind(module.clone())?;
        }
        Ok(cx)
    }

    /// The frozen convention registry.
    pub fn registry(&self) -> &ConventionRegistry {
        &self.registry
    }

    /// Bind a module to its convention.
    ///
    /// Rebinding a module that has not been configured yet replaces the
    /// earlier binding. The convention is resolved at configure time, not here.
    pub fn bind(&mut self, module: ModuleSpec) -> Result<(), ConventionError> {
        if self.configured.contains_key(&module.id) {
            return Err(ConventionError::ConfigurationLocked {
                subject: module.id.to_string(),
            });
        }

        if let Some(previous) = self.bindings.get(&module.id) {
            tracing::debug!(
                "rebinding module `{}` from `{}` to `{}`",
                module.id,
                previous.convention,
                module.convention
            );
        }
        self.bindings.insert(module.id.clone(), module);
        Ok(())
    }

    /// Get a bound module.
    pub fn binding(&self, id: &str) -> Option<&ModuleSpec> {
        self.bindings.get(id)
    }

    /// Ids of every bound module, sorted.
    pub fn module_ids(&self) -> Vec<Name> {
        self.bindings.keys().cloned().collect()
    }

    /// Configure one module.
    ///
    /// Resolves its convention, validates compatibility, selects the
    /// toolchain and freezes the module's task configs. Configuring an
    /// already-configured module returns the frozen result.
    pub fn configure_module(&mut self, id: &str) -> Result<&ModuleConfig, ConventionError> {
        let module = self.bindings.get(id).ok_or_else(|| ConventionError::UnknownModule {
            id: id.to_string(),
            known: self.bindings.keys().map(|k| k.to_string()).collect(),
        })?;

        if !self.configured.contains_key(id) {
            let config = Self::resolve_module(&self.registry, &mut self.selector, module)?;
            self.configured.insert(module.id.clone(), config);
        }

        self.configured
            .get(id)
            .ok_or_else(|| ConventionError::UnknownModule {
                id: id.to_string(),
                known: Vec::new(),
            })
    }

    /// Configure every bound module into a build plan.
    ///
    /// All or nothing: if any module fails, the first error is returned and
    /// no module of this call is recorded as configured.
    pub fn build_plan(&mut self) -> Result<BuildPlan, ConventionError> {
        let mut modules = BTreeMap::new();

        for (id, module) in &self.bindings {
            let config = match self.configured.get(id) {
                Some(config) => config.clone(),
                None => Self::resolve_module(&self.registry, &mut self.selector, module)?,
            };
            modules.insert(id.clone(), config);
        }

        for (id, config) in &modules {
            self.configured
                .entry(id.clone())
                .or_insert_with(|| config.clone());
        }
        let plan = BuildPlan::new(modules);

        tracing::info!("Configured {} module(s)", plan.len());
        Ok(plan)
    }

    fn resolve_module(
        registry: &ConventionRegistry,
        selector: &mut ToolchainSelector,
        module: &ModuleSpec,
    ) -> Result<ModuleConfig, ConventionError> {
        let definition = registry.resolve(&module.convention)?;
        let version = definition.language_version();

        ToolchainSelector::validate_compatibility(module, version)?;
        let toolchain = selector.select(version)?;

        let mut configurator = TaskConfigurator::new(module.clone(), definition);
        configurator.begin()?;
        configurator.finish(&toolchain)?;

        configurator
            .into_resolved()
            .ok_or_else(|| ConventionError::ConfigurationLocked {
                subject: module.id.to_string(),
            })
    }
}

impl fmt::Debug for ConfigurationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigurationContext")
            .field("conventions", &self.registry.len())
            .field("selector", &self.selector)
            .field("bindings", &self.bindings.keys().collect::<Vec<_>>())
            .field("configured", &self.configured.keys().collect::<Vec<_>>())
            .finish()
    }
}
