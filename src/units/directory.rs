//! # Directory: the live set of addressable runtime units.
//!
//! The directory is the registry consulted by every management-bus call: the
//! orchestrator and shutdown coordinator look a unit up by [`UnitId`] per
//! operation and never retain the proxy.
//!
//! ## Rules
//! - The directory owns membership: registration makes a unit addressable,
//!   unregistration removes it.
//! - `list_units()` returns a **stable snapshot**; the live set may shrink
//!   while callers iterate (entries are removed as units finish shutting
//!   down), and concurrent removal must never corrupt iteration.
//! - All operations are idempotent: double registration is rejected, double
//!   unregistration is a no-op returning `None`.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::units::unit::{UnitId, UnitRef};

/// Thread-safe registry of addressable runtime units.
pub struct Directory {
    units: RwLock<HashMap<UnitId, UnitRef>>,
}

impl Directory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self {
            units: RwLock::new(HashMap::new()),
        }
    }

    /// Makes a unit addressable under its own identifier.
    ///
    /// Returns `false` (and leaves the existing entry untouched) if the
    /// identifier is already registered.
    pub async fn register(&self, unit: UnitRef) -> bool {
        let id = unit.id().clone();
        let mut units = self.units.write().await;
        if units.contains_key(&id) {
            return false;
        }
        units.insert(id, unit);
        true
    }

    /// Resolves an identifier to its live proxy, if registered.
    pub async fn lookup(&self, id: &UnitId) -> Option<UnitRef> {
        self.units.read().await.get(id).cloned()
    }

    /// Removes a unit from the directory, returning its proxy if present.
    pub async fn unregister(&self, id: &UnitId) -> Option<UnitRef> {
        self.units.write().await.remove(id)
    }

    /// Returns a sorted, stable snapshot of the registered identifiers.
    ///
    /// Callers iterate the snapshot; concurrent removals only affect the live
    /// map.
    pub async fn list_units(&self) -> Vec<UnitId> {
        let units = self.units.read().await;
        let mut ids: Vec<UnitId> = units.keys().cloned().collect();
        ids.sort_unstable();
        ids
    }

    /// Returns true if `id` is currently registered.
    pub async fn is_registered(&self, id: &UnitId) -> bool {
        self.units.read().await.contains_key(id)
    }

    /// Returns true if no units are registered.
    pub async fn is_empty(&self) -> bool {
        self.units.read().await.is_empty()
    }

    /// Number of registered units.
    pub async fn len(&self) -> usize {
        self.units.read().await.len()
    }
}

impl Default for Directory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UnitError;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    struct Inert {
        id: UnitId,
    }

    #[async_trait]
    impl crate::units::ManagedUnit for Inert {
        fn id(&self) -> &UnitId {
            &self.id
        }
        async fn request_start(&self, _timeout: Duration) -> Result<(), UnitError> {
            Ok(())
        }
        async fn request_close(&self, _timeout: Option<Duration>) -> Result<(), UnitError> {
            Ok(())
        }
        async fn force_close(&self) -> Result<(), UnitError> {
            Ok(())
        }
    }

    fn unit(id: &str) -> UnitRef {
        Arc::new(Inert { id: UnitId::from(id) })
    }

    #[tokio::test]
    async fn test_register_lookup_unregister() {
        let dir = Directory::new();
        assert!(dir.register(unit("a")).await);
        assert!(dir.lookup(&UnitId::from("a")).await.is_some());
        assert!(dir.unregister(&UnitId::from("a")).await.is_some());
        assert!(dir.lookup(&UnitId::from("a")).await.is_none());
        assert!(dir.unregister(&UnitId::from("a")).await.is_none());
    }

    #[tokio::test]
    async fn test_double_registration_rejected() {
        let dir = Directory::new();
        assert!(dir.register(unit("a")).await);
        assert!(!dir.register(unit("a")).await);
        assert_eq!(dir.len().await, 1);
    }

    #[tokio::test]
    async fn test_list_units_is_sorted_snapshot() {
        let dir = Directory::new();
        dir.register(unit("c")).await;
        dir.register(unit("a")).await;
        dir.register(unit("b")).await;

        let snapshot = dir.list_units().await;
        assert_eq!(
            snapshot,
            vec![UnitId::from("a"), UnitId::from("b"), UnitId::from("c")]
        );

        // Removing after the snapshot does not disturb it.
        dir.unregister(&UnitId::from("b")).await;
        assert_eq!(snapshot.len(), 3);
        assert_eq!(dir.len().await, 2);
    }
}
