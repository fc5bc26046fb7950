//! Shared entity registry.
//!
//! Run-scoped store of prepared entities keyed by name. Insertion order is
//! preserved (built-in entities first, then user entities in declaration
//! order) and entities are frozen once preparation completes.

use crate::error::{Error, Result};
use crate::model::Entity;
use indexmap::IndexMap;

/// Stable handle to a registered entity, valid for the current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey(usize);

impl EntityKey {
    /// Position of the entity in insertion order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Slot {
    entity: Entity,
    frozen: bool,
}

/// Registry of the entities of one generation run.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entities: IndexMap<String, Slot>,
}

impl EntityRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every entity; called at the start of each run.
    pub fn clear(&mut self) {
        self.entities.clear();
    }

    /// Register an entity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateEntity`] if the name is already registered.
    pub fn insert(&mut self, entity: Entity) -> Result<EntityKey> {
        if self.entities.contains_key(&entity.name) {
            return Err(Error::duplicate_entity(&entity.name));
        }
        let (index, _) = self.entities.insert_full(
            entity.name.clone(),
            Slot {
                entity,
                frozen: false,
            },
        );
        Ok(EntityKey(index))
    }

    /// Look up an entity by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name).map(|slot| &slot.entity)
    }

    /// Mutable access to an entity that is still being prepared.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntityNotFound`] for an unknown name and
    /// [`Error::EntityFrozen`] once the entity has been frozen.
    pub fn get_mut(&mut self, name: &str) -> Result<&mut Entity> {
        let slot = self
            .entities
            .get_mut(name)
            .ok_or_else(|| Error::entity_not_found(name))?;
        if slot.frozen {
            return Err(Error::entity_frozen(name));
        }
        Ok(&mut slot.entity)
    }

    /// Mutable access by key; see [`Self::get_mut`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntityNotFound`] for a stale key and
    /// [`Error::EntityFrozen`] once the entity has been frozen.
    pub fn get_mut_by_key(&mut self, key: EntityKey) -> Result<&mut Entity> {
        let (name, slot) = self
            .entities
            .get_index_mut(key.0)
            .ok_or_else(|| Error::entity_not_found(format!("#{}", key.0)))?;
        if slot.frozen {
            return Err(Error::entity_frozen(name.as_str()));
        }
        Ok(&mut slot.entity)
    }

    /// Resolve a key handed out by [`Self::insert`] or [`Self::key_of`].
    #[must_use]
    pub fn resolve(&self, key: EntityKey) -> Option<&Entity> {
        self.entities.get_index(key.0).map(|(_, slot)| &slot.entity)
    }

    /// Key of a registered entity.
    #[must_use]
    pub fn key_of(&self, name: &str) -> Option<EntityKey> {
        self.entities.get_index_of(name).map(EntityKey)
    }

    /// Freeze an entity; later mutable access fails.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntityNotFound`] for an unknown name.
    pub fn freeze(&mut self, name: &str) -> Result<()> {
        let slot = self
            .entities
            .get_mut(name)
            .ok_or_else(|| Error::entity_not_found(name))?;
        slot.frozen = true;
        Ok(())
    }

    /// Whether an entity is frozen.
    #[must_use]
    pub fn is_frozen(&self, name: &str) -> bool {
        self.entities.get(name).is_some_and(|slot| slot.frozen)
    }

    /// Entities in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values().map(|slot| &slot.entity)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = EntityKey> {
        (0..self.entities.len()).map(EntityKey)
    }

    /// Entity names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    /// Number of registered entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApplicationConfig;
    use crate::model::{EntityDefinition, ResolvedOptions};
    use crate::model::definition::EntityOptions;

    fn entity(name: &str) -> Entity {
        let options = ResolvedOptions::resolve(
            &EntityOptions::default(),
            &ResolvedOptions::defaults(&ApplicationConfig::default()),
        );
        Entity::bare(EntityDefinition::named(name), options, name.to_lowercase())
    }

    #[test]
    fn test_insertion_order_and_keys() {
        let mut registry = EntityRegistry::new();
        let user = registry.insert(entity("User")).unwrap();
        let order = registry.insert(entity("Order")).unwrap();

        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["User", "Order"]);
        assert_eq!(registry.key_of("Order"), Some(order));
        assert_eq!(registry.resolve(user).unwrap().name, "User");
        assert_eq!(registry.keys().collect::<Vec<_>>(), vec![user, order]);
    }

    #[test]
    fn test_duplicate_entity() {
        let mut registry = EntityRegistry::new();
        registry.insert(entity("Order")).unwrap();
        let error = registry.insert(entity("Order")).unwrap_err();
        assert!(matches!(error, Error::DuplicateEntity { ref name } if name == "Order"));
    }

    #[test]
    fn test_frozen_entities_reject_mutation() {
        let mut registry = EntityRegistry::new();
        let key = registry.insert(entity("Order")).unwrap();
        registry.get_mut("Order").unwrap().javadoc = Some("An order".into());

        registry.freeze("Order").unwrap();
        assert!(registry.is_frozen("Order"));
        assert!(matches!(
            registry.get_mut("Order"),
            Err(Error::EntityFrozen { .. })
        ));
        assert!(matches!(
            registry.get_mut_by_key(key),
            Err(Error::EntityFrozen { .. })
        ));
        // reads are still allowed
        assert_eq!(registry.get("Order").unwrap().javadoc.as_deref(), Some("An order"));
    }

    #[test]
    fn test_missing_entity() {
        let mut registry = EntityRegistry::new();
        assert!(registry.get("Ghost").is_none());
        assert!(matches!(
            registry.get_mut("Ghost"),
            Err(Error::EntityNotFound { .. })
        ));
        assert!(registry.freeze("Ghost").is_err());
    }

    #[test]
    fn test_clear() {
        let mut registry = EntityRegistry::new();
        registry.insert(entity("Order")).unwrap();
        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.insert(entity("Order")).is_ok());
    }
}
