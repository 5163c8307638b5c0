//! Convention definitions.
//!
//! A convention is a named, reusable bundle of build-time and test-time
//! configuration: the language version, the ordered compiler arguments, the
//! preview/incubator features, and everything the test run needs. Once
//! built, a definition never changes; evolving a convention means
//! registering a new revision through an explicit supersede.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::core::coordinate::Coordinate;
use crate::core::errors::ConventionError;
use crate::core::feature::FeatureDefinition;
use crate::core::flag::FlagSequence;
use crate::util::Name;

/// A language (toolchain) version, always a positive integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct LanguageVersion(u32);

impl LanguageVersion {
    /// Validate a raw version number. `subject` names what declared it.
    pub fn new(value: i64, subject: &str) -> Result<Self, ConventionError> {
        match u32::try_from(value) {
            Ok(v) if v > 0 => Ok(LanguageVersion(v)),
            _ => Err(ConventionError::InvalidLanguageVersion {
                subject: subject.to_string(),
                value,
            }),
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for LanguageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for LanguageVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = i64::deserialize(deserializer)?;
        LanguageVersion::new(value, "language-version").map_err(serde::de::Error::custom)
    }
}

/// An immutable convention definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConventionDefinition {
    id: Name,
    revision: u32,
    language_version: LanguageVersion,
    compiler_args: FlagSequence,
    features: Vec<FeatureDefinition>,
    test_dependencies: BTreeSet<Coordinate>,
    test_system_properties: BTreeMap<String, String>,
    test_engine: Option<String>,
    test_runtime_args: bool,
    group: Option<String>,
    version: Option<String>,
    repositories: Vec<String>,
}

impl ConventionDefinition {
    /// Start building a definition.
    pub fn builder(
        id: impl Into<Name>,
        language_version: LanguageVersion,
    ) -> ConventionBuilder {
        ConventionBuilder {
            def: ConventionDefinition {
                id: id.into(),
                revision: 1,
                language_version,
                compiler_args: FlagSequence::new(),
                features: Vec::new(),
                test_dependencies: BTreeSet::new(),
                test_system_properties: BTreeMap::new(),
                test_engine: None,
                test_runtime_args: false,
                group: None,
                version: None,
                repositories: Vec::new(),
            },
        }
    }

    pub fn id(&self) -> &Name {
        &self.id
    }

    pub fn revision(&self) -> u32 {
        self.revision
    }

    pub fn language_version(&self) -> LanguageVersion {
        self.language_version
    }

    /// Compiler arguments, in declaration order.
    pub fn compiler_args(&self) -> &FlagSequence {
        &self.compiler_args
    }

    /// Feature catalog, in registration order.
    pub fn features(&self) -> &[FeatureDefinition] {
        &self.features
    }

    pub fn test_dependencies(&self) -> &BTreeSet<Coordinate> {
        &self.test_dependencies
    }

    pub fn test_system_properties(&self) -> &BTreeMap<String, String> {
        &self.test_system_properties
    }

    pub fn test_engine(&self) -> Option<&str> {
        self.test_engine.as_deref()
    }

    /// Whether test runs receive the execute-task runtime flags.
    pub fn test_runtime_args(&self) -> bool {
        self.test_runtime_args
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
}

/// Builder for [`ConventionDefinition`].
#[derive(Debug, Clone)]
pub struct ConventionBuilder {
    def: ConventionDefinition,
}

impl ConventionBuilder {
    pub fn revision(mut self, revision: u32) -> Self {
        self.def.revision = revision;
        self
    }

    pub fn compiler_args(mut self, args: FlagSequence) -> Self {
        self.def.compiler_args = args;
        self
    }

    /// Add a feature toggle. A second feature with the same name replaces
    /// the first in place.
    pub fn feature(mut self, feature: FeatureDefinition) -> Self {
        match self.def.features.iter_mut().find(|f| f.name == feature.name) {
            Some(existing) => *existing = feature,
            None => self.def.features.push(feature),
        }
        self
    }

    pub fn test_dependency(mut self, coordinate: Coordinate) -> Self {
        self.def.test_dependencies.insert(coordinate);
        self
    }

    pub fn test_system_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.def
            .test_system_properties
            .insert(key.into(), value.into());
        self
    }

    pub fn test_engine(mut self, engine: impl Into<String>) -> Self {
        self.def.test_engine = Some(engine.into());
        self
    }

    pub fn test_runtime_args(mut self, enabled: bool) -> Self {
        self.def.test_runtime_args = enabled;
        self
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.def.group = Some(group.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.def.version = Some(version.into());
        self
    }

    pub fn repository(mut self, repository: impl Into<String>) -> Self {
        self.def.repositories.push(repository.into());
        self
    }

    /// Finish the definition.
    pub fn build(self) -> Result<ConventionDefinition, ConventionError> {
        if self.def.revision == 0 {
            return Err(ConventionError::InvalidRevision {
                id: self.def.id.to_string(),
                value: 0,
            });
        }
        Ok(self.def)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_version_must_be_positive() {
        assert_eq!(LanguageVersion::new(17, "java-lib").unwrap().get(), 17);
        for bad in [0, -17, i64::from(u32::MAX) + 1] {
            let err = LanguageVersion::new(bad, "java-lib").unwrap_err();
            assert_eq!(
                err,
                ConventionError::InvalidLanguageVersion {
                    subject: "java-lib".to_string(),
                    value: bad,
                }
            );
        }
    }

    #[test]
    fn test_builder_preserves_compiler_arg_order() {
        let args: FlagSequence = ["--enable-preview", "-Xlint:all", "-parameters"]
            .into_iter()
            .collect();
        let def = ConventionDefinition::builder("java-lib", LanguageVersion::new(17, "t").unwrap())
            .compiler_args(args.clone())
            .build()
            .unwrap();
        assert_eq!(def.compiler_args(), &args);
        assert_eq!(def.revision(), 1);
        assert!(!def.test_runtime_args());
    }

    #[test]
    fn test_zero_revision_rejected() {
        let result = ConventionDefinition::builder("java-lib", LanguageVersion::new(17, "t").unwrap())
            .revision(0)
            .build();
        let err = result.unwrap_err();
        assert_eq!(
            err,
            ConventionError::InvalidRevision {
                id: "java-lib".to_string(),
                value: 0,
            }
        );
        assert_eq!(err.to_string(), "invalid revision 0 for convention `java-lib`");
    }

    #[test]
    fn test_duplicate_feature_replaces() {
        let def = ConventionDefinition::builder("java-lib", LanguageVersion::new(19, "t").unwrap())
            .feature(FeatureDefinition::new("incubator", ["--add-modules", "A"].into_iter().collect()))
            .feature(FeatureDefinition::new("incubator", ["--add-modules", "B"].into_iter().collect()))
            .build()
            .unwrap();
        assert_eq!(def.features().len(), 1);
        assert_eq!(def.features()[0].flags.to_string(), "--add-modules B");
    }
}
