//! Toolchain selection.
//!
//! A module's convention names a language version; the selector finds an
//! installed toolchain for exactly that version or fails. Missing toolchains
//! are never retried: the same inputs always produce the same failure.
//!
//! Toolchain discovery order:
//! 1. Toolchain config file (`.berth/toolchains.toml` or `~/.berth/toolchains.toml`)
//! 2. `JAVA_HOME`
//! 3. Configured install directories (scanned for `release` files)
//! 4. `java` on `PATH`

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::convention::LanguageVersion;
use crate::core::errors::ConventionError;
use crate::core::module::ModuleSpec;

mod detect;

pub use detect::{
    detect_selector, parse_release_file, InstallDirProvider, JavaHomeProvider, PathProvider,
    StaticProvider,
};

/// Where a toolchain was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolchainOrigin {
    /// Declared in a toolchain config file
    Config,
    /// Pointed to by `JAVA_HOME`
    JavaHome,
    /// Found under a configured install directory
    InstallDir,
    /// Found on `PATH`
    Path,
}

impl ToolchainOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolchainOrigin::Config => "config",
            ToolchainOrigin::JavaHome => "JAVA_HOME",
            ToolchainOrigin::InstallDir => "install-dir",
            ToolchainOrigin::Path => "PATH",
        }
    }
}

/// An installed toolchain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Toolchain {
    /// Language version the toolchain implements
    pub language_version: LanguageVersion,

    /// Installation root
    pub home: PathBuf,

    /// Vendor/implementor, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,

    /// Discovery source
    pub origin: ToolchainOrigin,
}

impl Toolchain {
    /// Create a toolchain description.
    pub fn new(language_version: LanguageVersion, home: impl Into<PathBuf>, origin: ToolchainOrigin) -> Self {
        Toolchain {
            language_version,
            home: home.into(),
            vendor: None,
            origin,
        }
    }

    /// Set the vendor, if known.
    pub fn with_vendor(mut self, vendor: Option<String>) -> Self {
        self.vendor = vendor;
        self
    }
}

impl fmt::Display for Toolchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.language_version)?;
        if let Some(ref vendor) = self.vendor {
            write!(f, " ({})", vendor)?;
        }
        write!(f, " at {} [{}]", self.home.display(), self.origin.as_str())
    }
}

/// A source of installed toolchains.
///
/// Providers never fail: unreadable locations are logged and skipped so that
/// one broken install does not hide the others.
pub trait ToolchainProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Toolchains this provider can see.
    fn toolchains(&self) -> Vec<Toolchain>;
}

/// Locates and validates toolchains for requested language versions.
pub struct ToolchainSelector {
    providers: Vec<Box<dyn ToolchainProvider>>,
    selected: BTreeMap<LanguageVersion, Toolchain>,
}

impl ToolchainSelector {
    /// Create a selector with no providers.
    pub fn new() -> Self {
        ToolchainSelector {
            providers: Vec::new(),
            selected: BTreeMap::new(),
        }
    }

    /// Add a provider. Providers are consulted in insertion order.
    pub fn with_provider(mut self, provider: impl ToolchainProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Select the toolchain for a language version.
    ///
    /// The first provider reporting a matching toolchain wins. Successful
    /// selections are remembered; failures are not, but they are
    /// deterministic for unchanged providers.
    pub fn select(&mut self, version: LanguageVersion) -> Result<Toolchain, ConventionError> {
        if let Some(toolchain) = self.selected.get(&version) {
            return Ok(toolchain.clone());
        }

        let mut available = Vec::new();
        for provider in &self.providers {
            for toolchain in provider.toolchains() {
                if toolchain.language_version == version {
                    tracing::info!("Using toolchain {} from {}", toolchain, provider.name());
                    self.selected.insert(version, toolchain.clone());
                    return Ok(toolchain);
                }
                available.push(toolchain.language_version.get());
            }
        }

        available.sort_unstable();
        available.dedup();
        Err(ConventionError::ToolchainUnavailable {
            version: version.get(),
            available,
        })
    }

    /// Enforce `source == target == language version` for a module.
    ///
    /// Compatibilities the module leaves unset default to the language version.
    pub fn validate_compatibility(
        module: &ModuleSpec,
        version: LanguageVersion,
    ) -> Result<(), ConventionError> {
        let source = module.source_compatibility.unwrap_or(version);
        let target = module.target_compatibility.unwrap_or(version);

        if source != version || target != version {
            return Err(ConventionError::IncompatibleVersion {
                module: module.id.to_string(),
                language_version: version.get(),
                source_compatibility: source.get(),
                target_compatibility: target.get(),
            });
        }
        Ok(())
    }

    /// Every toolchain visible to any provider, in provider order.
    pub fn list(&self) -> Vec<Toolchain> {
        self.providers
            .iter()
            .flat_map(|p| p.toolchains())
            .collect()
    }

    /// Number of providers.
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }
}

impl Default for ToolchainSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ToolchainSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.providers.iter().map(|p| p.name()).collect();
        f.debug_struct("ToolchainSelector")
            .field("providers", &names)
            .field("selected", &self.selected)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{toolchain, version, CountingProvider};

    #[test]
    fn test_select_matching_version() {
        let mut selector = ToolchainSelector::new()
            .with_provider(StaticProvider::new(vec![toolchain(11), toolchain(17)]));

        let selected = selector.select(version(17)).unwrap();
        assert_eq!(selected.language_version.get(), 17);
    }

    #[test]
    fn test_first_provider_wins() {
        let first = toolchain(17).with_vendor(Some("temurin".to_string()));
        let second = toolchain(17).with_vendor(Some("zulu".to_string()));
        let mut selector = ToolchainSelector::new()
            .with_provider(StaticProvider::new(vec![first]))
            .with_provider(StaticProvider::new(vec![second]));

        assert_eq!(selector.select(version(17)).unwrap().vendor.as_deref(), Some("temurin"));
    }

    #[test]
    fn test_unavailable_is_deterministic() {
        let mut selector = ToolchainSelector::new()
            .with_provider(StaticProvider::new(vec![toolchain(17), toolchain(11), toolchain(17)]));

        let expected = ConventionError::ToolchainUnavailable {
            version: 21,
            available: vec![11, 17],
        };
        for _ in 0..5 {
            assert_eq!(selector.select(version(21)).unwrap_err(), expected);
        }
    }

    #[test]
    fn test_selection_is_cached() {
        let provider = CountingProvider::new(vec![toolchain(17)]);
        let calls = provider.calls();
        let mut selector = ToolchainSelector::new().with_provider(provider);

        selector.select(version(17)).unwrap();
        selector.select(version(17)).unwrap();
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn test_compatibility_defaults_to_language_version() {
        let module = ModuleSpec::new("yarl-core", "java-lib");
        assert!(ToolchainSelector::validate_compatibility(&module, version(19)).is_ok());
    }

    #[test]
    fn test_compatibility_mismatch() {
        let module = ModuleSpec::new("yarl-core", "java-lib").with_compatibility(version(19), version(17));
        let err = ToolchainSelector::validate_compatibility(&module, version(19)).unwrap_err();
        assert_eq!(
            err,
            ConventionError::IncompatibleVersion {
                module: "yarl-core".to_string(),
                language_version: 19,
                source_compatibility: 19,
                target_compatibility: 17,
            }
        );

        let module = ModuleSpec::new("yarl-core", "java-lib").with_compatibility(version(17), version(17));
        assert!(ToolchainSelector::validate_compatibility(&module, version(19)).is_err());
    }
}
