//! Toolchain configuration files.
//!
//! Berth reads installed-toolchain declarations from two locations:
//! - Global: `~/.berth/toolchains.toml` - User-wide defaults
//! - Project: `.berth/toolchains.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::convention::LanguageVersion;

/// Toolchain configuration file contents.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Toolchain settings
    pub toolchains: ToolchainSettings,
}

/// Toolchain discovery settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ToolchainSettings {
    /// Explicitly declared toolchains
    pub installed: Vec<InstalledToolchain>,

    /// Directories scanned for toolchain installs (e.g. /usr/lib/jvm)
    pub search_paths: Vec<PathBuf>,

    /// Whether to consider `JAVA_HOME` (default: true)
    pub use_java_home: Option<bool>,

    /// Whether to consider `java` on `PATH` (default: true)
    pub use_path: Option<bool>,
}

/// A toolchain declared by hand.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InstalledToolchain {
    /// Language version
    pub version: LanguageVersion,

    /// Installation root
    pub home: PathBuf,

    /// Vendor/implementor
    #[serde(default)]
    pub vendor: Option<String>,
}

impl ToolchainSettings {
    pub fn use_java_home(&self) -> bool {
        self.use_java_home.unwrap_or(true)
    }

    pub fn use_path(&self) -> bool {
        self.use_path.unwrap_or(true)
    }
}

impl ToolchainConfig {
    /// Load toolchain configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read toolchain config: {}", path.display()))?;

        let config = toml::from_str(&contents)
            .with_context(|| format!("failed to parse toolchain config: {}", path.display()))?;
        tracing::debug!("loaded toolchain config from {}", path.display());
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence).
    ///
    /// Lists are replaced, not concatenated.
    pub fn merge(&mut self, other: ToolchainConfig) {
        if !other.toolchains.installed.is_empty() {
            self.toolchains.installed = other.toolchains.installed;
        }
        if !other.toolchains.search_paths.is_empty() {
            self.toolchains.search_paths = other.toolchains.search_paths;
        }
        if other.toolchains.use_java_home.is_some() {
            self.toolchains.use_java_home = other.toolchains.use_java_home;
        }
        if other.toolchains.use_path.is_some() {
            self.toolchains.use_path = other.toolchains.use_path;
        }
    }
}

/// Load merged toolchain configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.berth/toolchains.toml)
/// 2. Global config (~/.berth/toolchains.toml)
/// 3. Defaults
///
/// A file that exists but does not parse is an error, never a silent default.
pub fn load_toolchain_config(
    global_path: Option<&Path>,
    project_path: &Path,
) -> Result<ToolchainConfig> {
    let mut config = ToolchainConfig::default();

    if let Some(global) = global_path.filter(|p| p.exists()) {
        config.merge(ToolchainConfig::load(global)?);
    }

    if project_path.exists() {
        config.merge(ToolchainConfig::load(project_path)?);
    }

    Ok(config)
}

/// Get the global berth config directory (~/.berth).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".berth"))
}

/// Get the global toolchain config path (~/.berth/toolchains.toml).
pub fn global_toolchain_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("toolchains.toml"))
}

/// Get the project toolchain config path (.berth/toolchains.toml).
pub fn project_toolchain_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".berth").join("toolchains.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_toolchain_config_default() {
        let config = ToolchainConfig::default();
        assert!(config.toolchains.installed.is_empty());
        assert!(config.toolchains.use_java_home());
        assert!(config.toolchains.use_path());
    }

    #[test]
    fn test_toolchain_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("toolchains.toml");

        std::fs::write(
            &config_path,
            r#"
[toolchains]
search-paths = ["/usr/lib/jvm"]
use-path = false

[[toolchains.installed]]
version = 19
home = "/opt/jdk-19"
vendor = "temurin"
"#,
        )
        .unwrap();

        let config = ToolchainConfig::load(&config_path).unwrap();
        assert_eq!(config.toolchains.installed.len(), 1);
        assert_eq!(config.toolchains.installed[0].version.get(), 19);
        assert_eq!(config.toolchains.installed[0].home, PathBuf::from("/opt/jdk-19"));
        assert_eq!(config.toolchains.search_paths, vec![PathBuf::from("/usr/lib/jvm")]);
        assert!(!config.toolchains.use_path());
        assert!(config.toolchains.use_java_home());
    }

    #[test]
    fn test_toolchain_config_rejects_zero_version() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("toolchains.toml");
        std::fs::write(
            &config_path,
            "[[toolchains.installed]]\nversion = 0\nhome = \"/opt/jdk\"\n",
        )
        .unwrap();

        assert!(ToolchainConfig::load(&config_path).is_err());
    }

    #[test]
    fn test_load_toolchain_config_precedence() {
        let tmp = TempDir::new().unwrap();
        let global_path = tmp.path().join("global.toml");
        let project_path = tmp.path().join("project.toml");

        std::fs::write(
            &global_path,
            r#"
[toolchains]
search-paths = ["/usr/lib/jvm"]
use-java-home = false

[[toolchains.installed]]
version = 11
home = "/opt/jdk-11"
"#,
        )
        .unwrap();

        std::fs::write(
            &project_path,
            r#"
[[toolchains.installed]]
version = 19
home = "/opt/jdk-19"
"#,
        )
        .unwrap();

        let config = load_toolchain_config(Some(&global_path), &project_path).unwrap();

        // Project list replaces the global one
        assert_eq!(config.toolchains.installed.len(), 1);
        assert_eq!(config.toolchains.installed[0].version.get(), 19);
        // Global settings the project leaves alone are preserved
        assert_eq!(config.toolchains.search_paths, vec![PathBuf::from("/usr/lib/jvm")]);
        assert!(!config.toolchains.use_java_home());
    }

    #[test]
    fn test_malformed_project_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let project_path = tmp.path().join("project.toml");
        std::fs::write(&project_path, "[toolchains]\nuse-java-home = \"no\"\n").unwrap();

        let err = load_toolchain_config(None, &project_path).unwrap_err();
        assert!(format!("{:#}", err).contains("failed to parse toolchain config"));
    }
}
