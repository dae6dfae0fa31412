//! Base registry.
//!
//! Generic id-keyed storage shared by the tool catalogue and the agent set.
//! Items are returned in registration order so that declarations and status
//! listings are stable.

use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::error::RegistryError;

/// Trait for items that can be stored in a registry.
pub trait Registerable: Send + Sync {
    /// Returns the unique identifier for this item.
    fn registry_id(&self) -> &str;
}

/// Generic registry for managing items by ID.
pub struct BaseRegistry<T: ?Sized + Registerable> {
    items: DashMap<String, Arc<T>>,
    order: RwLock<Vec<String>>,
}

impl<T: ?Sized + Registerable> BaseRegistry<T> {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
            order: RwLock::new(Vec::new()),
        }
    }

    /// Register an item.
    ///
    /// Returns an error if an item with the same ID is already registered.
    pub fn register(&self, item: Arc<T>) -> Result<(), RegistryError> {
        let id = item.registry_id().to_string();

        let mut order = self.order.write();
        if self.items.contains_key(&id) {
            return Err(RegistryError::AlreadyRegistered(id));
        }

        self.items.insert(id.clone(), item);
        order.push(id);
        Ok(())
    }

    /// Get an item by ID.
    pub fn get(&self, id: &str) -> Option<Arc<T>> {
        self.items.get(id).map(|item| item.clone())
    }

    /// Check if an item with the given ID is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// List all registered item IDs in registration order.
    pub fn list_ids(&self) -> Vec<String> {
        self.order.read().clone()
    }

    /// Get the number of registered items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All items in registration order.
    pub fn values(&self) -> Vec<Arc<T>> {
        self.order
            .read()
            .iter()
            .filter_map(|id| self.get(id))
            .collect()
    }
}

impl<T: ?Sized + Registerable> Default for BaseRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "base_tests.rs"]
mod tests;
