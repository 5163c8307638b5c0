//! Berth.toml manifest parsing and schema.
//!
//! The manifest declares conventions (as an ordered array, so registration
//! order is explicit) and the modules bound to them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::convention::{ConventionDefinition, LanguageVersion};
use crate::core::coordinate::Coordinate;
use crate::core::errors::ConventionError;
use crate::core::feature::FeatureDefinition;
use crate::core::flag::FlagSequence;
use crate::core::module::ModuleSpec;
use crate::core::registry::ConventionRegistry;
use crate::util::diagnostic::ManifestSyntaxError;

/// Canonical manifest file name.
pub const MANIFEST_NAME: &str = "Berth.toml";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawManifest {
    #[serde(default, rename = "convention")]
    conventions: Vec<RawConvention>,

    #[serde(default, rename = "module")]
    modules: Vec<ModuleSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawConvention {
    id: String,
    #[serde(default = "default_revision")]
    revision: u32,
    #[serde(default)]
    supersedes: bool,
    language_version: i64,
    #[serde(default)]
    compiler_args: FlagSequence,
    #[serde(default)]
    group: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    repositories: Vec<String>,
    #[serde(default)]
    test_engine: Option<String>,
    #[serde(default)]
    test_runtime_args: bool,
    #[serde(default)]
    test_dependencies: Vec<String>,
    #[serde(default)]
    test_system_properties: BTreeMap<String, String>,
    #[serde(default, rename = "feature")]
    features: Vec<FeatureDefinition>,
}

fn default_revision() -> u32 {
    1
}

impl RawConvention {
    fn into_declaration(self) -> Result<ConventionDeclaration, ConventionError> {
        let language_version = LanguageVersion::new(self.language_version, &self.id)?;

        let mut builder = ConventionDefinition::builder(self.id.as_str(), language_version)
            .revision(self.revision)
            .compiler_args(self.compiler_args)
            .test_runtime_args(self.test_runtime_args);

        for coord in &self.test_dependencies {
            builder = builder.test_dependency(coord.parse::<Coordinate>()?);
        }
        for (key, value) in self.test_system_properties {
            builder = builder.test_system_property(key, value);
        }
        for feature in self.features {
            builder = builder.feature(feature);
        }
        for repo in self.repositories {
            builder = builder.repository(repo);
        }
        if let Some(engine) = self.test_engine {
            builder = builder.test_engine(engine);
        }
        if let Some(group) = self.group {
            builder = builder.group(group);
        }
        if let Some(version) = self.version {
            builder = builder.version(version);
        }

        Ok(ConventionDeclaration {
            definition: builder.build()?,
            supersedes: self.supersedes,
        })
    }
}

/// A convention as declared in the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionDeclaration {
    pub definition: ConventionDefinition,

    /// Register through `supersede` rather than `register`.
    pub supersedes: bool,
}

/// The parsed Berth.toml manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    /// Conventions in declaration order
    pub conventions: Vec<ConventionDeclaration>,

    /// Declared modules in declaration order
    pub modules: Vec<ModuleSpec>,

    /// The directory containing this manifest
    pub manifest_dir: PathBuf,
}

impl Manifest {
    /// Load a manifest from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        let dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();
        Self::parse(&contents, dir)
            .with_context(|| format!("failed to parse manifest: {}", path.display()))
    }

    /// Parse manifest contents.
    pub fn parse(contents: &str, manifest_dir: PathBuf) -> Result<Self> {
        let raw: RawManifest = toml::from_str(contents).map_err(|e| {
            ManifestSyntaxError::from_toml(&manifest_dir.join(MANIFEST_NAME), contents, &e)
        })?;

        let conventions = raw
            .conventions
            .into_iter()
            .map(RawConvention::into_declaration)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Manifest {
            conventions,
            modules: raw.modules,
            manifest_dir,
        })
    }

    /// Populate a registry from the declared conventions and freeze it.
    ///
    /// Declarations are applied in order; the first failure aborts the whole
    /// population.
    pub fn populate_registry(&self) -> Result<ConventionRegistry, ConventionError> {
        let mut registry = ConventionRegistry::new();
        for decl in &self.conventions {
            if decl.supersedes {
                registry.supersede(decl.definition.clone())?;
            } else {
                registry.register(decl.definition.clone())?;
            }
        }
        registry.freeze();
        Ok(registry)
    }

    /// Find a declared module by id.
    pub fn module(&self, id: &str) -> Option<&ModuleSpec> {
        // Later declarations replace earlier ones.
        self.modules.iter().rev().find(|m| m.id.as_str() == id)
    }
}
