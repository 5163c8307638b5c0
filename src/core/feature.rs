//! Feature toggles (preview / incubator capabilities).
//!
//! A toggle maps a name to a flag sequence. When enabled, the whole sequence
//! is appended to the module's flags; when disabled, nothing of it is. Toggles
//! apply in registration order.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::flag::FlagSequence;
use crate::util::Name;

/// A feature declared by a convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureDefinition {
    /// Toggle name (e.g. "incubator")
    pub name: Name,

    /// Flags appended when the toggle is enabled
    pub flags: FlagSequence,

    /// Whether the toggle starts enabled
    #[serde(default)]
    pub default: bool,
}

impl FeatureDefinition {
    pub fn new(name: impl Into<Name>, flags: FlagSequence) -> Self {
        FeatureDefinition {
            name: name.into(),
            flags,
            default: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Toggle {
    name: Name,
    flags: FlagSequence,
    enabled: bool,
}

/// Mutable set of toggles, only held while a module is being configured.
#[derive(Debug, Clone, Default)]
pub struct FeatureFlagSetBuilder {
    toggles: Vec<Toggle>,
    unknown: Vec<Name>,
}

impl FeatureFlagSetBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder pre-populated with a convention's feature catalog.
    pub fn from_catalog(features: &[FeatureDefinition]) -> Self {
        let mut builder = Self::new();
        for feature in features {
            builder.define(feature.name.clone(), feature.flags.clone(), feature.default);
        }
        builder
    }

    /// Define a toggle. Redefining a name replaces its flags and state but
    /// keeps its original position.
    pub fn define(
        &mut self,
        name: impl Into<Name>,
        flags: FlagSequence,
        enabled: bool,
    ) -> &mut Self {
        let name = name.into();
        match self.toggles.iter_mut().find(|t| t.name == name) {
            Some(existing) => {
                existing.flags = flags;
                existing.enabled = enabled;
            }
            None => self.toggles.push(Toggle {
                name,
                flags,
                enabled,
            }),
        }
        self
    }

    /// Enable a toggle.
    pub fn enable(&mut self, name: &str) -> &mut Self {
        self.set(name, true)
    }

    /// Disable a toggle.
    pub fn disable(&mut self, name: &str) -> &mut Self {
        self.set(name, false)
    }

    /// Set a toggle's state. Unknown names are remembered but apply nothing,
    /// since a module may target a convention that predates the toggle.
    pub fn set(&mut self, name: &str, enabled: bool) -> &mut Self {
        match self.toggles.iter_mut().find(|t| t.name.as_str() == name) {
            Some(toggle) => toggle.enabled = enabled,
            None => {
                tracing::debug!("ignoring unknown feature `{}`", name);
                let name = Name::new(name);
                if !self.unknown.contains(&name) {
                    self.unknown.push(name);
                }
            }
        }
        self
    }

    /// Query a toggle; unknown names are disabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.toggles
            .iter()
            .any(|t| t.enabled && t.name.as_str() == name)
    }

    /// Freeze the builder into an immutable set.
    pub fn build(self) -> FeatureFlagSet {
        FeatureFlagSet {
            toggles: self.toggles.into(),
            unknown: self.unknown.into(),
        }
    }
}

/// An immutable set of feature toggles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureFlagSet {
    toggles: Arc<[Toggle]>,
    unknown: Arc<[Name]>,
}

impl FeatureFlagSet {
    /// Query a toggle; unknown names are disabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.toggles
            .iter()
            .any(|t| t.enabled && t.name.as_str() == name)
    }

    /// Names of enabled toggles, in registration order.
    pub fn enabled_names(&self) -> Vec<Name> {
        self.toggles
            .iter()
            .filter(|t| t.enabled)
            .map(|t| t.name.clone())
            .collect()
    }

    /// Concatenated flags of every enabled toggle, in registration order.
    pub fn enabled_flags(&self) -> FlagSequence {
        let mut flags = FlagSequence::new();
        for toggle in self.toggles.iter().filter(|t| t.enabled) {
            flags.extend_from(&toggle.flags);
        }
        flags
    }

    /// Names that were toggled but never defined.
    pub fn unknown_names(&self) -> &[Name] {
        &self.unknown
    }
}

impl Default for FeatureFlagSet {
    fn default() -> Self {
        FeatureFlagSetBuilder::new().build()
    }
}
