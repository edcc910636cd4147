//! Provider registry for managing action providers.
//!
//! The [`ProviderRegistry`] keeps one shared provider instance per
//! [`ProviderKind`] and a sparse map of entity bindings. Resolution goes
//! entity binding first, then the default kind.

use std::collections::HashMap;
use std::sync::Arc;

use combat_core::EntityId;

use super::{ActionProvider, PassActionProvider, ProviderKind, Result, RuntimeError};

/// Registry for managing action providers with entity-specific bindings.
///
/// ```text
/// ProviderRegistry
/// ├── providers: HashMap<ProviderKind, Provider>  (provider instances)
/// ├── entity_mappings: HashMap<EntityId, ProviderKind>  (entity bindings)
/// └── default_kind: ProviderKind  (fallback)
/// ```
pub struct ProviderRegistry {
    /// Arc so a provider can be awaited without borrowing the registry.
    providers: HashMap<ProviderKind, Arc<dyn ActionProvider>>,

    /// Only entities that differ from the default are stored.
    entity_mappings: HashMap<EntityId, ProviderKind>,

    default_kind: ProviderKind,
}

impl ProviderRegistry {
    /// Create a registry whose default is a registered [`PassActionProvider`].
    pub fn new() -> Self {
        let mut providers: HashMap<ProviderKind, Arc<dyn ActionProvider>> = HashMap::new();
        providers.insert(ProviderKind::Pass, Arc::new(PassActionProvider));
        Self {
            providers,
            entity_mappings: HashMap::new(),
            default_kind: ProviderKind::Pass,
        }
    }

    /// Register a provider for a specific kind, replacing any previous one.
    pub fn register(&mut self, kind: ProviderKind, provider: impl ActionProvider + 'static) {
        self.providers.insert(kind, Arc::new(provider));
    }

    /// Register a provider that is already shared elsewhere.
    pub fn register_shared(&mut self, kind: ProviderKind, provider: Arc<dyn ActionProvider>) {
        self.providers.insert(kind, provider);
    }

    /// Register a boxed provider for a specific kind.
    pub fn register_boxed(&mut self, kind: ProviderKind, provider: Box<dyn ActionProvider>) {
        self.providers.insert(kind, Arc::from(provider));
    }

    /// Bind an entity to a specific provider kind.
    ///
    /// ```ignore
    /// registry.bind_entity(EntityId(0), ProviderKind::Interactive);
    /// registry.bind_entity(EntityId(3), ProviderKind::Ai(Behavior::Aggressive));
    /// ```
    pub fn bind_entity(&mut self, entity: EntityId, kind: ProviderKind) {
        self.entity_mappings.insert(entity, kind);
    }

    /// Unbind an entity, reverting it to the default provider.
    ///
    /// Returns the previous provider kind if it was bound.
    pub fn unbind_entity(&mut self, entity: EntityId) -> Option<ProviderKind> {
        self.entity_mappings.remove(&entity)
    }

    pub fn set_default(&mut self, kind: ProviderKind) {
        self.default_kind = kind;
    }

    pub fn default_kind(&self) -> ProviderKind {
        self.default_kind
    }

    /// The explicitly bound kind, or the default if not bound.
    pub fn get_entity_kind(&self, entity: EntityId) -> ProviderKind {
        self.entity_mappings
            .get(&entity)
            .copied()
            .unwrap_or(self.default_kind)
    }

    /// Get the provider for an entity.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::ProviderNotSet` if the resolved provider kind
    /// has no registered provider instance.
    pub fn get_for_entity(&self, entity: EntityId) -> Result<Arc<dyn ActionProvider>> {
        let kind = self.get_entity_kind(entity);
        self.get(kind)
    }

    /// Get a provider for a specific kind.
    pub fn get(&self, kind: ProviderKind) -> Result<Arc<dyn ActionProvider>> {
        self.providers
            .get(&kind)
            .cloned()
            .ok_or(RuntimeError::ProviderNotSet { kind })
    }

    pub fn has(&self, kind: ProviderKind) -> bool {
        self.providers.contains_key(&kind)
    }

    pub fn is_entity_bound(&self, entity: EntityId) -> bool {
        self.entity_mappings.contains_key(&entity)
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    pub fn binding_count(&self) -> usize {
        self.entity_mappings.len()
    }

    /// Kinds that some entity (or the default) resolves to but that have no
    /// provider registered.
    pub fn missing_kinds(&self) -> Vec<ProviderKind> {
        let mut missing = Vec::new();
        for kind in std::iter::once(self.default_kind).chain(self.entity_mappings.values().copied())
        {
            if !self.has(kind) && !missing.contains(&kind) {
                missing.push(kind);
            }
        }
        missing
    }

    /// Remove a provider for a specific kind.
    ///
    /// Entities bound to this kind fail to resolve until rebound.
    pub fn unregister(&mut self, kind: ProviderKind) -> Option<Arc<dyn ActionProvider>> {
        self.providers.remove(&kind)
    }

    /// Clear all entity bindings (they will use the default provider).
    pub fn clear_bindings(&mut self) {
        self.entity_mappings.clear();
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.providers.keys().collect::<Vec<_>>())
            .field("entity_mappings", &self.entity_mappings)
            .field("default_kind", &self.default_kind)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ai::Behavior;

    #[test]
    fn unbound_entities_use_the_default() {
        let registry = ProviderRegistry::new();
        assert_eq!(registry.get_entity_kind(EntityId(4)), ProviderKind::Pass);
        assert!(registry.get_for_entity(EntityId(4)).is_ok());
    }

    #[test]
    fn bindings_override_the_default() {
        let mut registry = ProviderRegistry::new();
        registry.bind_entity(EntityId(1), ProviderKind::Interactive);

        assert!(registry.is_entity_bound(EntityId(1)));
        assert!(matches!(
            registry.get_for_entity(EntityId(1)),
            Err(RuntimeError::ProviderNotSet {
                kind: ProviderKind::Interactive
            })
        ));

        registry.register(ProviderKind::Interactive, PassActionProvider);
        assert!(registry.get_for_entity(EntityId(1)).is_ok());

        assert_eq!(
            registry.unbind_entity(EntityId(1)),
            Some(ProviderKind::Interactive)
        );
        assert_eq!(registry.get_entity_kind(EntityId(1)), ProviderKind::Pass);
    }

    #[test]
    fn reports_unregistered_kinds() {
        let mut registry = ProviderRegistry::new();
        registry.bind_entity(EntityId(0), ProviderKind::Ai(Behavior::Aggressive));
        registry.bind_entity(EntityId(1), ProviderKind::Pass);

        assert_eq!(
            registry.missing_kinds(),
            vec![ProviderKind::Ai(Behavior::Aggressive)]
        );
    }
}
