//! Enumeration of known sessions.
//!
//! Pure read over the turn store: no caching, every call re-queries, so the
//! result always reflects the store state at call time.

use std::sync::Arc;

use crate::store::{StoreError, TurnStore};

/// Lists the session ids held by the turn store.
pub struct SessionRegistry {
    store: Arc<TurnStore>,
}

impl SessionRegistry {
    pub fn new(store: Arc<TurnStore>) -> Self {
        Self { store }
    }

    /// All known session ids, any order.
    pub async fn list_session_ids(&self) -> Result<Vec<String>, StoreError> {
        self.store.list_session_ids().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::types::Turn;

    #[tokio::test]
    async fn test_registry_reflects_store_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(
            TurnStore::open(&dir.path().join("agent_storage.db"))
                .await
                .unwrap(),
        );
        let registry = SessionRegistry::new(Arc::clone(&store));

        assert!(registry.list_session_ids().await.unwrap().is_empty());

        store.append("abc", &Turn::user("hi")).await.unwrap();

        // No caching: the new session is visible on the next call
        let ids = registry.list_session_ids().await.unwrap();
        assert_eq!(ids, vec!["abc".to_string()]);
    }
}
