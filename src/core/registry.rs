//! Convention registry.
//!
//! Maps a convention id to its active definition. The registry is populated
//! once while the build initializes, then frozen; after that it is shared
//! read-only state. There is no process-wide instance: the registry is owned
//! by a [`ConfigurationContext`](crate::builder::ConfigurationContext).

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::convention::ConventionDefinition;
use crate::core::errors::ConventionError;
use crate::util::Name;

/// Every revision ever registered for one convention id.
#[derive(Debug, Clone)]
struct ConventionEntry {
    /// Oldest first; the last element is the active definition.
    revisions: Vec<Arc<ConventionDefinition>>,
}

impl ConventionEntry {
    fn active(&self) -> &Arc<ConventionDefinition> {
        // Entries are created with one revision and only ever grow.
        &self.revisions[self.revisions.len() - 1]
    }
}

/// Store of convention definitions keyed by id.
#[derive(Debug, Clone, Default)]
pub struct ConventionRegistry {
    entries: BTreeMap<Name, ConventionEntry>,
    frozen: bool,
}

impl ConventionRegistry {
    /// Create an empty, unfrozen registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new convention.
    ///
    /// Fails if the id is already registered; the first definition is kept.
    pub fn register(
        &mut self,
        definition: ConventionDefinition,
    ) -> Result<Arc<ConventionDefinition>, ConventionError> {
        self.ensure_mutable()?;

        let id = definition.id().clone();
        if let Some(existing) = self.entries.get(&id) {
            return Err(ConventionError::DuplicateConvention {
                id: id.to_string(),
                existing_revision: existing.active().revision(),
            });
        }

        tracing::debug!(
            "registered convention `{}` (revision {}, language version {})",
            id,
            definition.revision(),
            definition.language_version()
        );

        let definition = Arc::new(definition);
        self.entries.insert(
            id,
            ConventionEntry {
                revisions: vec![Arc::clone(&definition)],
            },
        );
        Ok(definition)
    }

    /// Replace the active definition of an existing convention.
    ///
    /// The new definition must carry a strictly greater revision. Earlier
    /// revisions stay reachable through [`ConventionRegistry::resolve_revision`].
    pub fn supersede(
        &mut self,
        definition: ConventionDefinition,
    ) -> Result<Arc<ConventionDefinition>, ConventionError> {
        self.ensure_mutable()?;

        let id = definition.id().clone();
        let known = self.known_ids();
        let entry = self
            .entries
            .get_mut(&id)
            .ok_or_else(|| ConventionError::UnknownConvention {
                id: id.to_string(),
                known,
            })?;

        let current = entry.active().revision();
        if definition.revision() <= current {
            return Err(ConventionError::StaleRevision {
                id: id.to_string(),
                current,
                attempted: definition.revision(),
            });
        }

        tracing::debug!(
            "convention `{}` superseded: revision {} -> {}",
            id,
            current,
            definition.revision()
        );

        let definition = Arc::new(definition);
        entry.revisions.push(Arc::clone(&definition));
        Ok(definition)
    }

    /// Resolve the active definition for an id.
    pub fn resolve(&self, id: &str) -> Result<Arc<ConventionDefinition>, ConventionError> {
        self.entries
            .get(id)
            .map(|entry| Arc::clone(entry.active()))
            .ok_or_else(|| ConventionError::UnknownConvention {
                id: id.to_string(),
                known: self.known_ids(),
            })
    }

    /// Resolve a specific, possibly superseded, revision.
    pub fn resolve_revision(
        &self,
        id: &str,
        revision: u32,
    ) -> Result<Arc<ConventionDefinition>, ConventionError> {
        self.entries
            .get(id)
            .and_then(|entry| entry.revisions.iter().find(|d| d.revision() == revision))
            .cloned()
            .ok_or_else(|| ConventionError::UnknownConvention {
                id: format!("{}@{}", id, revision),
                known: self.known_ids(),
            })
    }

    /// Revisions registered for an id, oldest first.
    pub fn revisions(&self, id: &str) -> Vec<u32> {
        self.entries
            .get(id)
            .map(|entry| entry.revisions.iter().map(|d| d.revision()).collect())
            .unwrap_or_default()
    }

    /// Stop accepting registrations.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Whether the registry has been frozen.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Active definitions, ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ConventionDefinition>> + '_ {
        self.entries.values().map(ConventionEntry::active)
    }

    /// Check if an id is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of registered conventions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn known_ids(&self) -> Vec<String> {
        self.entries.keys().map(|id| id.to_string()).collect()
    }

    fn ensure_mutable(&self) -> Result<(), ConventionError> {
        if self.frozen {
            return Err(ConventionError::ConfigurationLocked {
                subject: "convention registry".to_string(),
            });
        }
        Ok(())
    }
}
