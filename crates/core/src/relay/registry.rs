use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Identifier assigned to a live connection.
pub type ConnectionId = u64;

/// Process-wide set of open connections.
///
/// Append/remove only; never iterated for cross-connection behavior.
/// Registration hands back an RAII guard so removal runs on every exit
/// path, normal or error.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    next_id: AtomicU64,
    connections: Mutex<HashSet<ConnectionId>>,
}

impl ConnectionRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register a new connection, returning its guard.
    pub fn register(self: &Arc<Self>) -> ConnectionGuard {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.lock().insert(id);
        ConnectionGuard {
            registry: Arc::clone(self),
            id,
        }
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.lock().contains(&id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn remove(&self, id: ConnectionId) {
        self.lock().remove(&id);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<ConnectionId>> {
        // A poisoned lock only means another connection panicked mid-update;
        // the set itself is still usable.
        self.connections
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Removes its connection from the registry on drop.
#[derive(Debug)]
pub struct ConnectionGuard {
    registry: Arc<ConnectionRegistry>,
    id: ConnectionId,
}

impl ConnectionGuard {
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.registry.remove(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_adds_connection() {
        let registry = ConnectionRegistry::new();
        let guard = registry.register();
        assert!(registry.contains(guard.id()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_drop_removes_connection() {
        let registry = ConnectionRegistry::new();
        let id = {
            let guard = registry.register();
            guard.id()
        };
        assert!(!registry.contains(id));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        let registry = ConnectionRegistry::new();
        let a = registry.register();
        let b = registry.register();
        let c = registry.register();
        assert_ne!(a.id(), b.id());
        assert_ne!(b.id(), c.id());
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_entry_survives_other_connection_close() {
        let registry = ConnectionRegistry::new();
        let kept = registry.register();
        {
            let _dropped = registry.register();
        }
        assert!(registry.contains(kept.id()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_removed_on_panic_unwind() {
        let registry = ConnectionRegistry::new();
        let registry_clone = Arc::clone(&registry);
        let result = std::panic::catch_unwind(move || {
            let _guard = registry_clone.register();
            panic!("connection handler panicked");
        });
        assert!(result.is_err());
        assert!(registry.is_empty());
    }
}
