//! Resolved task configurations and the build plan.
//!
//! The build plan is the only thing Berth hands to the outside world: the
//! compiler, the runtime and the test engine consume it as-is. Nothing in it
//! is mutated after it has been assembled.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::core::convention::{ConventionDefinition, LanguageVersion};
use crate::core::coordinate::Coordinate;
use crate::core::errors::ConventionError;
use crate::core::flag::FlagSequence;
use crate::core::module::ProjectBinding;
use crate::core::task::TaskKind;
use crate::util::hash::Fingerprint;
use crate::util::Name;

use super::toolchain::Toolchain;

/// The materialized configuration of one concrete task.
///
/// Read-only once resolved:
///
/// ```compile_fail
/// fn append(task: &mut berth::ResolvedTaskConfig) {
///     task.flags = Default::default();
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResolvedTaskConfig {
    module: Name,
    kind: TaskKind,
    convention: Name,
    revision: u32,
    language_version: LanguageVersion,
    toolchain: Toolchain,

    /// Compiler arguments (compile) or runtime arguments (execute, test)
    flags: FlagSequence,

    /// Process properties visible to the test run
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    system_properties: BTreeMap<String, String>,

    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    test_dependencies: BTreeSet<Coordinate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    test_engine: Option<String>,
}

impl ResolvedTaskConfig {
    /// A task config with no flags and no test setup.
    pub(crate) fn new(
        module: Name,
        kind: TaskKind,
        definition: &ConventionDefinition,
        toolchain: Toolchain,
    ) -> Self {
        ResolvedTaskConfig {
            module,
            kind,
            convention: definition.id().clone(),
            revision: definition.revision(),
            language_version: definition.language_version(),
            toolchain,
            flags: FlagSequence::new(),
            system_properties: BTreeMap::new(),
            test_dependencies: BTreeSet::new(),
            test_engine: None,
        }
    }

    pub(crate) fn with_flags(mut self, flags: FlagSequence) -> Self {
        self.flags = flags;
        self
    }

    /// Carry the convention's test properties, dependencies and engine.
    pub(crate) fn with_test_setup(mut self, definition: &ConventionDefinition) -> Self {
        self.system_properties = definition.test_system_properties().clone();
        self.test_dependencies = definition.test_dependencies().clone();
        self.test_engine = definition.test_engine().map(str::to_string);
        self
    }

    pub fn module(&self) -> &Name {
        &self.module
    }

    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    pub fn convention(&self) -> &Name {
        &self.convention
    }

    pub fn revision(&self) -> u32 {
        self.revision
    }

    pub fn language_version(&self) -> LanguageVersion {
        self.language_version
    }

    pub fn toolchain(&self) -> &Toolchain {
        &self.toolchain
    }

    /// Compiler arguments (compile) or runtime arguments (execute, test).
    pub fn flags(&self) -> &FlagSequence {
        &self.flags
    }

    pub fn system_properties(&self) -> &BTreeMap<String, String> {
        &self.system_properties
    }

    pub fn test_dependencies(&self) -> &BTreeSet<Coordinate> {
        &self.test_dependencies
    }

    pub fn test_engine(&self) -> Option<&str> {
        self.test_engine.as_deref()
    }

    /// System properties rendered as `-Dkey=value` arguments.
    pub fn system_property_args(&self) -> Vec<String> {
        self.system_properties
            .iter()
            .map(|(k, v)| format!("-D{}={}", k, v))
            .collect()
    }

    /// Full argument list handed to the external tool: flags, then properties.
    pub fn command_args(&self) -> Vec<String> {
        let mut args = self.flags.to_args();
        args.extend(self.system_property_args());
        args
    }

    fn fingerprint_into(&self, fp: &mut Fingerprint) {
        fp.update_str(self.kind.as_str())
            .update_str(self.convention.as_str())
            .update_str(&self.revision.to_string())
            .update_str(&self.language_version.to_string())
            .update_str(&self.toolchain.home.to_string_lossy())
            .update_strs(self.flags.iter().map(|t| t.as_str()));
        for (key, value) in &self.system_properties {
            fp.update_str(key).update_str(value);
        }
        for dep in &self.test_dependencies {
            fp.update_str(&dep.to_string());
        }
        fp.update_opt(self.test_engine.as_deref());
    }
}

/// The frozen set of resolved task configs for one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ModuleConfig {
    binding: ProjectBinding,

    #[serde(skip_serializing_if = "Option::is_none")]
    group: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    repositories: Vec<String>,

    /// Enabled feature toggles, in application order
    features: Vec<Name>,

    tasks: BTreeMap<TaskKind, ResolvedTaskConfig>,

    /// Stable hash of the resolved content
    fingerprint: String,
}

impl ModuleConfig {
    /// Assemble a module config, checking the compile/execute flag invariant.
    pub(crate) fn assemble(
        binding: ProjectBinding,
        group: Option<String>,
        version: Option<String>,
        repositories: Vec<String>,
        features: Vec<Name>,
        tasks: BTreeMap<TaskKind, ResolvedTaskConfig>,
    ) -> Result<Self, ConventionError> {
        let mut fp = Fingerprint::new();
        fp.update_str(binding.module.as_str())
            .update_str(binding.convention.as_str())
            .update_opt(group.as_deref())
            .update_opt(version.as_deref())
            .update_strs(repositories.iter().map(String::as_str))
            .update_strs(features.iter().map(|f| f.as_str()));
        for task in tasks.values() {
            task.fingerprint_into(&mut fp);
        }

        let config = ModuleConfig {
            binding,
            group,
            version,
            repositories,
            features,
            tasks,
            fingerprint: fp.finish_short(),
        };
        config.verify_flag_equivalence()?;
        Ok(config)
    }

    pub fn binding(&self) -> &ProjectBinding {
        &self.binding
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn repositories(&self) -> &[String] {
        &self.repositories
    }

    /// Enabled feature toggles, in application order.
    pub fn features(&self) -> &[Name] {
        &self.features
    }

    /// Get the resolved config for a task kind.
    pub fn task(&self, kind: TaskKind) -> Option<&ResolvedTaskConfig> {
        self.tasks.get(&kind)
    }

    /// Resolved task configs ordered by kind.
    pub fn tasks(&self) -> &BTreeMap<TaskKind, ResolvedTaskConfig> {
        &self.tasks
    }

    /// Stable hash of the resolved content.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Check that compile and execute tasks carry identical flag sequences.
    fn verify_flag_equivalence(&self) -> Result<(), ConventionError> {
        let (Some(compile), Some(execute)) =
            (self.task(TaskKind::Compile), self.task(TaskKind::Execute))
        else {
            return Ok(());
        };

        if let Some(pos) = compile.flags.first_divergence(&execute.flags) {
            tracing::debug!(
                "flag sequences of `{}` diverge at position {}",
                self.binding.module,
                pos
            );
            return Err(ConventionError::FlagDivergence {
                module: self.binding.module.to_string(),
                convention: self.binding.convention.to_string(),
                compile: compile.flags.clone(),
                execute: execute.flags.clone(),
            });
        }
        Ok(())
    }
}

/// Resolved configuration of every module of the build.
///
/// ```compile_fail
/// fn drop_all(plan: &mut berth::BuildPlan) {
///     plan.modules.clear();
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildPlan {
    /// Module configs ordered by module id
    modules: BTreeMap<Name, ModuleConfig>,
}

impl BuildPlan {
    pub(crate) fn new(modules: BTreeMap<Name, ModuleConfig>) -> Self {
        BuildPlan { modules }
    }

    /// Module configs ordered by module id.
    pub fn modules(&self) -> &BTreeMap<Name, ModuleConfig> {
        &self.modules
    }

    /// Get a module's config.
    pub fn module(&self, id: &str) -> Option<&ModuleConfig> {
        self.modules.get(id)
    }

    /// Number of modules in the plan.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Check if the plan is empty.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Serialize the plan as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{toolchain, version};

    fn task(kind: TaskKind, flags: &[&str]) -> ResolvedTaskConfig {
        ResolvedTaskConfig {
            module: "yarl-core".into(),
            kind,
            convention: "java-lib".into(),
            revision: 1,
            language_version: version(17),
            toolchain: toolchain(17),
            flags: flags.iter().copied().collect(),
            system_properties: BTreeMap::new(),
            test_dependencies: BTreeSet::new(),
            test_engine: None,
        }
    }

    fn binding() -> ProjectBinding {
        ProjectBinding {
            module: "yarl-core".into(),
            convention: "java-lib".into(),
        }
    }

    #[test]
    fn test_divergent_flags_rejected() {
        let mut tasks = BTreeMap::new();
        tasks.insert(TaskKind::Compile, task(TaskKind::Compile, &["--enable-preview", "--add-modules", "X"]));
        tasks.insert(TaskKind::Execute, task(TaskKind::Execute, &["--enable-preview"]));

        let err = ModuleConfig::assemble(binding(), None, None, vec![], vec![], tasks).unwrap_err();
        assert!(matches!(err, ConventionError::FlagDivergence { ref module, .. } if module == "yarl-core"));
    }

    #[test]
    fn test_compile_only_module_is_valid() {
        let mut tasks = BTreeMap::new();
        tasks.insert(TaskKind::Compile, task(TaskKind::Compile, &["--enable-preview"]));
        assert!(ModuleConfig::assemble(binding(), None, None, vec![], vec![], tasks).is_ok());
    }

    #[test]
    fn test_fingerprint_tracks_flags() {
        let build = |flags: &[&str]| {
            let mut tasks = BTreeMap::new();
            tasks.insert(TaskKind::Compile, task(TaskKind::Compile, flags));
            ModuleConfig::assemble(binding(), None, None, vec![], vec![], tasks)
                .unwrap()
                .fingerprint()
                .to_string()
        };
        assert_eq!(build(&["-a", "-b"]), build(&["-a", "-b"]));
        assert_ne!(build(&["-a", "-b"]), build(&["-b", "-a"]));
    }

    #[test]
    fn test_system_property_args() {
        let mut test = task(TaskKind::Test, &[]);
        test.system_properties.insert(
            "junit.jupiter.testinstance.lifecycle.default".to_string(),
            "per_class".to_string(),
        );
        assert_eq!(
            test.command_args(),
            vec!["-Djunit.jupiter.testinstance.lifecycle.default=per_class"]
        );
    }

    #[test]
    fn test_plan_views_match_serialized_form() {
        let mut tasks = BTreeMap::new();
        tasks.insert(TaskKind::Compile, task(TaskKind::Compile, &["--enable-preview"]));
        tasks.insert(TaskKind::Execute, task(TaskKind::Execute, &["--enable-preview"]));
        let config = ModuleConfig::assemble(binding(), None, None, vec![], vec![], tasks).unwrap();
        let fingerprint = config.fingerprint().to_string();

        let plan = BuildPlan::new(BTreeMap::from([(config.binding().module.clone(), config)]));
        let module = plan.module("yarl-core").unwrap();
        assert_eq!(module.fingerprint(), fingerprint);
        assert_eq!(module.tasks().len(), 2);

        let json: serde_json::Value = serde_json::from_str(&plan.to_json().unwrap()).unwrap();
        assert_eq!(json["modules"]["yarl-core"]["fingerprint"], fingerprint);
        assert_eq!(
            json["modules"]["yarl-core"]["tasks"]["compile"]["flags"],
            json["modules"]["yarl-core"]["tasks"]["execute"]["flags"]
        );
    }
}
