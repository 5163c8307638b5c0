//! Global context for Berth operations.
//!
//! Provides centralized access to the working directory, the manifest
//! location and the toolchain configuration files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::core::manifest::MANIFEST_NAME;
use crate::util::config::{
    global_config_dir, global_toolchain_config_path, load_toolchain_config,
    project_toolchain_config_path, ToolchainConfig,
};

/// Error locating a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("could not find `Berth.toml` in `{}` or any parent directory", dir.display())]
    NotFound { dir: PathBuf },

    #[error("manifest path `{}` does not exist", path.display())]
    Missing { path: PathBuf },
}

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Home directory for global Berth data (~/.berth/)
    home: PathBuf,

    /// Manifest path given on the command line, if any
    manifest_path: Option<PathBuf>,

    /// Whether to use verbose output
    verbose: bool,

    /// Whether to use colors in output
    color: bool,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        let home = global_config_dir().unwrap_or_else(|| PathBuf::from(".berth"));

        Ok(GlobalContext {
            cwd,
            home,
            manifest_path: None,
            verbose: false,
            color: true,
        })
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Result<Self> {
        let mut ctx = Self::new()?;
        ctx.cwd = cwd;
        Ok(ctx)
    }

    /// Use an explicit manifest path instead of searching from cwd.
    pub fn with_manifest_path(mut self, path: Option<PathBuf>) -> Self {
        self.manifest_path = path.map(|p| if p.is_absolute() { p } else { self.cwd.join(p) });
        self
    }

    /// Set verbose mode.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Set color output.
    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the Berth home directory (~/.berth/).
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Check if verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Check if color output is enabled.
    pub fn color(&self) -> bool {
        self.color
    }

    /// Find the manifest, starting from cwd and searching upward.
    pub fn find_manifest(&self) -> Result<PathBuf, ManifestError> {
        if let Some(ref path) = self.manifest_path {
            return if path.is_file() {
                Ok(path.clone())
            } else {
                Err(ManifestError::Missing { path: path.clone() })
            };
        }

        let mut current = self.cwd.clone();
        loop {
            let candidate = current.join(MANIFEST_NAME);
            if candidate.is_file() {
                return Ok(candidate);
            }
            if !current.pop() {
                return Err(ManifestError::NotFound {
                    dir: self.cwd.clone(),
                });
            }
        }
    }

    /// Find the project root (directory containing Berth.toml).
    pub fn find_project_root(&self) -> Result<PathBuf, ManifestError> {
        let manifest = self.find_manifest()?;
        Ok(manifest
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.cwd.clone()))
    }

    /// Merged global and project toolchain configuration.
    pub fn toolchain_config(&self, project_root: &Path) -> Result<ToolchainConfig> {
        let global = global_toolchain_config_path();
        load_toolchain_config(global.as_deref(), &project_toolchain_config_path(project_root))
    }
}
