//! Test fixtures for common test scenarios.

use std::path::{Path, PathBuf};

/// A manifest declaring the shared Java conventions and one module bound to
/// them.
pub const YARL_MANIFEST: &str = r#"
[[convention]]
id = "java-conventions"
revision = 1
language-version = 19
compiler-args = ["--enable-preview"]
group = "htnl5.yarl"
version = "1.0-SNAPSHOT"
repositories = ["mavenCentral"]
test-engine = "junit-platform"
test-runtime-args = true
test-dependencies = [
    "org.junit.jupiter:junit-jupiter:5.9.1",
    "org.assertj:assertj-core:3.23.1",
]

[convention.test-system-properties]
"junit.jupiter.testinstance.lifecycle.default" = "per_class"

[[convention.feature]]
name = "incubator"
flags = ["--add-modules", "jdk.incubator.concurrent"]
default = true

[[module]]
id = "yarl-core"
convention = "java-conventions"
"#;

/// Create a fake toolchain install `<root>/<dirname>` with a `release` file.
pub fn fake_jdk(root: &Path, dirname: &str, version: &str) -> PathBuf {
    let home = root.join(dirname);
    std::fs::create_dir_all(home.join("bin")).unwrap();
    std::fs::write(
        home.join("release"),
        format!("IMPLEMENTOR=\"Berth Test\"\nJAVA_VERSION=\"{}\"\n", version),
    )
    .unwrap();
    home
}

/// Fixture for a project directory: a manifest plus a project toolchain config.
#[derive(Debug, Clone)]
pub struct ProjectFixture {
    /// Berth.toml content
    pub manifest: String,
    /// Toolchains declared in `.berth/toolchains.toml` (version, home)
    pub toolchains: Vec<(u32, PathBuf)>,
}

impl ProjectFixture {
    /// A project with the given manifest and no toolchains.
    pub fn new(manifest: impl Into<String>) -> Self {
        ProjectFixture {
            manifest: manifest.into(),
            toolchains: Vec::new(),
        }
    }

    /// The shared Java conventions project.
    pub fn yarl() -> Self {
        Self::new(YARL_MANIFEST)
    }

    /// Declare an installed toolchain.
    pub fn with_toolchain(mut self, version: u32, home: impl Into<PathBuf>) -> Self {
        self.toolchains.push((version, home.into()));
        self
    }

    /// Write the fixture into `root`. Environment discovery (`JAVA_HOME`,
    /// `PATH`) is switched off so only declared toolchains are visible.
    pub fn write_to(&self, root: &Path) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(root)?;
        std::fs::write(root.join("Berth.toml"), &self.manifest)?;

        let mut config = String::from("[toolchains]\nuse-java-home = false\nuse-path = false\n");
        for (version, home) in &self.toolchains {
            config.push_str(&format!(
                "\n[[toolchains.installed]]\nversion = {}\nhome = {:?}\n",
                version,
                home.display().to_string()
            ));
        }

        let berth_dir = root.join(".berth");
        std::fs::create_dir_all(&berth_dir)?;
        std::fs::write(berth_dir.join("toolchains.toml"), config)?;

        Ok(root.join("Berth.toml"))
    }
}
