//! Toolchain discovery providers.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use walkdir::WalkDir;

use crate::core::convention::LanguageVersion;
use crate::util::config::ToolchainConfig;

use super::{Toolchain, ToolchainOrigin, ToolchainProvider, ToolchainSelector};

static JAVA_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^JAVA_VERSION="?(\d+)(?:\.(\d+))?"#).unwrap());

static IMPLEMENTOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^IMPLEMENTOR="?([^"\r\n]+)"?"#).unwrap());

/// Parse a JDK `release` file into a language version and vendor.
///
/// Legacy `1.x` versions map to `x` (so `1.8.0_292` is version 8).
pub fn parse_release_file(contents: &str) -> Option<(LanguageVersion, Option<String>)> {
    let caps = JAVA_VERSION.captures(contents)?;
    let major: i64 = caps.get(1)?.as_str().parse().ok()?;
    let major = if major == 1 {
        caps.get(2)?.as_str().parse().ok()?
    } else {
        major
    };

    let version = LanguageVersion::new(major, "release file").ok()?;
    let vendor = IMPLEMENTOR
        .captures(contents)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string());

    Some((version, vendor))
}

/// Read the `release` file of an installation root.
fn probe_home(home: &Path, origin: ToolchainOrigin) -> Option<Toolchain> {
    let release = home.join("release");
    let contents = match std::fs::read_to_string(&release) {
        Ok(contents) => contents,
        Err(e) => {
            tracing::debug!("No readable release file at {}: {}", release.display(), e);
            return None;
        }
    };

    let Some((version, vendor)) = parse_release_file(&contents) else {
        tracing::warn!("Unrecognized toolchain release file: {}", release.display());
        return None;
    };

    Some(Toolchain::new(version, home, origin).with_vendor(vendor))
}

/// Provider over a fixed list of toolchains (config entries, tests).
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    toolchains: Vec<Toolchain>,
}

impl StaticProvider {
    pub fn new(toolchains: Vec<Toolchain>) -> Self {
        StaticProvider { toolchains }
    }

    /// Build a provider from the `installed` entries of a toolchain config.
    pub fn from_config(config: &ToolchainConfig) -> Self {
        let toolchains = config
            .toolchains
            .installed
            .iter()
            .map(|entry| {
                Toolchain::new(entry.version, &entry.home, ToolchainOrigin::Config)
                    .with_vendor(entry.vendor.clone())
            })
            .collect();
        StaticProvider { toolchains }
    }
}

impl ToolchainProvider for StaticProvider {
    fn name(&self) -> &str {
        "config"
    }

    fn toolchains(&self) -> Vec<Toolchain> {
        self.toolchains.clone()
    }
}

/// Provider for the installation `JAVA_HOME` points at.
#[derive(Debug, Clone)]
pub struct JavaHomeProvider {
    home: Option<PathBuf>,
}

impl JavaHomeProvider {
    /// Read `JAVA_HOME` from the environment.
    pub fn from_env() -> Self {
        JavaHomeProvider {
            home: std::env::var_os("JAVA_HOME")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }

    pub fn new(home: impl Into<PathBuf>) -> Self {
        JavaHomeProvider {
            home: Some(home.into()),
        }
    }
}

impl ToolchainProvider for JavaHomeProvider {
    fn name(&self) -> &str {
        "JAVA_HOME"
    }

    fn toolchains(&self) -> Vec<Toolchain> {
        self.home
            .as_deref()
            .and_then(|home| probe_home(home, ToolchainOrigin::JavaHome))
            .into_iter()
            .collect()
    }
}

/// Provider scanning install directories (e.g. `/usr/lib/jvm`) for
/// toolchain roots.
#[derive(Debug, Clone)]
pub struct InstallDirProvider {
    roots: Vec<PathBuf>,
}

impl InstallDirProvider {
    /// Maximum depth below a root at which a `release` file is recognized
    /// (`<root>/jdk-17/release`, or `<root>/jdk-17/Contents/Home/release` on macOS).
    const MAX_DEPTH: usize = 4;

    pub fn new(roots: Vec<PathBuf>) -> Self {
        InstallDirProvider { roots }
    }
}

impl ToolchainProvider for InstallDirProvider {
    fn name(&self) -> &str {
        "install-dir"
    }

    fn toolchains(&self) -> Vec<Toolchain> {
        let mut found = Vec::new();

        for root in &self.roots {
            if !root.is_dir() {
                tracing::debug!("Toolchain search path does not exist: {}", root.display());
                continue;
            }

            // Sorted so results do not depend on directory iteration order.
            let walker = WalkDir::new(root)
                .min_depth(2)
                .max_depth(Self::MAX_DEPTH)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok());

            for entry in walker {
                if entry.file_type().is_file() && entry.file_name() == "release" {
                    if let Some(home) = entry.path().parent() {
                        if let Some(tc) = probe_home(home, ToolchainOrigin::InstallDir) {
                            found.push(tc);
                        }
                    }
                }
            }
        }

        found
    }
}

/// Provider for the `java` executable found on `PATH`.
#[derive(Debug, Clone, Default)]
pub struct PathProvider;

impl ToolchainProvider for PathProvider {
    fn name(&self) -> &str {
        "PATH"
    }

    fn toolchains(&self) -> Vec<Toolchain> {
        let Ok(java) = which::which("java") else {
            return Vec::new();
        };

        // Follow alternatives symlinks to the real install: <home>/bin/java
        let java = std::fs::canonicalize(&java).unwrap_or(java);
        java.parent()
            .and_then(Path::parent)
            .and_then(|home| probe_home(home, ToolchainOrigin::Path))
            .into_iter()
            .collect()
    }
}

/// Build a selector from a toolchain config, in discovery priority order.
pub fn detect_selector(config: &ToolchainConfig) -> ToolchainSelector {
    let settings = &config.toolchains;
    let mut selector = ToolchainSelector::new().with_provider(StaticProvider::from_config(config));

    if settings.use_java_home() {
        selector = selector.with_provider(JavaHomeProvider::from_env());
    }
    if !settings.search_paths.is_empty() {
        selector = selector.with_provider(InstallDirProvider::new(settings.search_paths.clone()));
    }
    if settings.use_path() {
        selector = selector.with_provider(PathProvider);
    }

    tracing::debug!("Toolchain selector with {} providers", selector.provider_count());
    selector
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fake_jdk, version};
    use crate::util::config::InstalledToolchain;
    use tempfile::TempDir;

    #[test]
    fn test_parse_release_file() {
        let (v, vendor) = parse_release_file(
            "IMPLEMENTOR=\"Eclipse Adoptium\"\nJAVA_VERSION=\"17.0.2\"\n",
        )
        .unwrap();
        assert_eq!(v.get(), 17);
        assert_eq!(vendor.as_deref(), Some("Eclipse Adoptium"));
    }

    #[test]
    fn test_parse_legacy_release_file() {
        let (v, vendor) = parse_release_file("JAVA_VERSION=\"1.8.0_292\"\n").unwrap();
        assert_eq!(v.get(), 8);
        assert_eq!(vendor, None);
    }

    #[test]
    fn test_parse_release_file_without_version() {
        assert!(parse_release_file("IMPLEMENTOR=\"Oracle\"\n").is_none());
        assert!(parse_release_file("JAVA_VERSION=\"0\"\n").is_none());
    }

    #[test]
    fn test_java_home_provider() {
        let tmp = TempDir::new().unwrap();
        let home = fake_jdk(tmp.path(), "jdk-19", "19.0.1");

        let found = JavaHomeProvider::new(&home).toolchains();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].language_version.get(), 19);
        assert_eq!(found[0].origin, ToolchainOrigin::JavaHome);
    }

    #[test]
    fn test_java_home_without_release_file() {
        let tmp = TempDir::new().unwrap();
        assert!(JavaHomeProvider::new(tmp.path()).toolchains().is_empty());
    }

    #[test]
    fn test_install_dir_provider_scans_sorted() {
        let tmp = TempDir::new().unwrap();
        fake_jdk(tmp.path(), "jdk-21", "21");
        fake_jdk(tmp.path(), "jdk-17", "17.0.9");
        std::fs::create_dir_all(tmp.path().join("not-a-jdk")).unwrap();

        let found = InstallDirProvider::new(vec![tmp.path().to_path_buf()]).toolchains();
        let versions: Vec<u32> = found.iter().map(|t| t.language_version.get()).collect();
        assert_eq!(versions, vec![17, 21]);
    }

    #[test]
    fn test_install_dir_provider_missing_root() {
        let provider = InstallDirProvider::new(vec![PathBuf::from("/nonexistent/berth/jvm")]);
        assert!(provider.toolchains().is_empty());
    }

    #[test]
    fn test_detect_selector_prefers_config() {
        let tmp = TempDir::new().unwrap();
        fake_jdk(tmp.path(), "jdk-17", "17.0.9");

        let mut config = ToolchainConfig::default();
        config.toolchains.use_java_home = Some(false);
        config.toolchains.use_path = Some(false);
        config.toolchains.search_paths = vec![tmp.path().to_path_buf()];
        config.toolchains.installed.push(InstalledToolchain {
            version: version(17),
            home: PathBuf::from("/opt/pinned-jdk-17"),
            vendor: None,
        });

        let mut selector = detect_selector(&config);
        assert_eq!(selector.provider_count(), 2);

        let selected = selector.select(version(17)).unwrap();
        assert_eq!(selected.origin, ToolchainOrigin::Config);
        assert_eq!(selected.home, PathBuf::from("/opt/pinned-jdk-17"));
    }
}
