//! Module declarations and convention bindings.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::core::convention::LanguageVersion;
use crate::core::task::TaskKind;
use crate::util::Name;

/// A module of the multi-module build, as declared in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ModuleSpec {
    /// Module identifier
    pub id: Name,

    /// Convention the module is bound to
    pub convention: Name,

    /// Task kinds the module exposes; only these are configured
    #[serde(default = "default_tasks")]
    pub tasks: BTreeSet<TaskKind>,

    /// Per-module feature overrides (name -> enabled)
    #[serde(default)]
    pub features: BTreeMap<String, bool>,

    /// Declared source compatibility (defaults to the language version)
    #[serde(default)]
    pub source_compatibility: Option<LanguageVersion>,

    /// Declared target compatibility (defaults to the language version)
    #[serde(default)]
    pub target_compatibility: Option<LanguageVersion>,
}

fn default_tasks() -> BTreeSet<TaskKind> {
    TaskKind::ALL.into_iter().collect()
}

impl ModuleSpec {
    /// Create a module exposing every task kind.
    pub fn new(id: impl Into<Name>, convention: impl Into<Name>) -> Self {
        ModuleSpec {
            id: id.into(),
            convention: convention.into(),
            tasks: default_tasks(),
            features: BTreeMap::new(),
            source_compatibility: None,
            target_compatibility: None,
        }
    }

    /// Restrict the module to the given task kinds.
    pub fn with_tasks(mut self, tasks: impl IntoIterator<Item = TaskKind>) -> Self {
        self.tasks = tasks.into_iter().collect();
        self
    }

    /// Override a feature toggle for this module.
    pub fn with_feature(mut self, name: impl Into<String>, enabled: bool) -> Self {
        self.features.insert(name.into(), enabled);
        self
    }

    /// Declare source and target compatibility.
    pub fn with_compatibility(mut self, source: LanguageVersion, target: LanguageVersion) -> Self {
        self.source_compatibility = Some(source);
        self.target_compatibility = Some(target);
        self
    }

    /// Check whether the module exposes a task kind.
    pub fn declares(&self, kind: TaskKind) -> bool {
        self.tasks.contains(&kind)
    }

    /// The binding of this module to its convention.
    pub fn binding(&self) -> ProjectBinding {
        ProjectBinding {
            module: self.id.clone(),
            convention: self.convention.clone(),
        }
    }
}

/// The association of a module with exactly one convention.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectBinding {
    pub module: Name,
    pub convention: Name,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tasks() {
        let module = ModuleSpec::new("yarl-core", "java-conventions");
        assert!(TaskKind::ALL.iter().all(|k| module.declares(*k)));
    }

    #[test]
    fn test_parse_module_spec() {
        let module: ModuleSpec = toml::from_str(
            r#"
id = "yarl-core"
convention = "java-conventions"
tasks = ["compile", "test"]
features = { incubator = false }
source-compatibility = 17
"#,
        )
        .unwrap();

        assert_eq!(module.id.as_str(), "yarl-core");
        assert!(module.declares(TaskKind::Compile));
        assert!(!module.declares(TaskKind::Execute));
        assert_eq!(module.features.get("incubator"), Some(&false));
        assert_eq!(module.source_compatibility.map(|v| v.get()), Some(17));
        assert_eq!(module.target_compatibility, None);
    }

    #[test]
    fn test_parse_rejects_zero_compatibility() {
        let result = toml::from_str::<ModuleSpec>(
            "id = \"m\"\nconvention = \"c\"\nsource-compatibility = 0\n",
        );
        assert!(result.is_err());
    }
}
