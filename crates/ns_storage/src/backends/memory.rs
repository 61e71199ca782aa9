use async_trait::async_trait;
use ns_core::{KeywordSet, KeywordStorage, Result};
use std::sync::Arc;
use tokio::sync::RwLock;
use crate::StorageBackend;

/// Keeps the keyword set for the lifetime of the process only.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    store: Arc<RwLock<Option<KeywordSet>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keywords(keywords: KeywordSet) -> Self {
        Self {
            store: Arc::new(RwLock::new(Some(keywords))),
        }
    }
}

impl StorageBackend for MemoryStorage {
    fn get_error_message() -> &'static str {
        "Memory storage should be available"
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}

#[async_trait]
impl KeywordStorage for MemoryStorage {
    async fn load(&self) -> Result<Option<KeywordSet>> {
        let store = self.store.read().await;
        Ok(store.clone())
    }

    async fn save(&self, keywords: &KeywordSet) -> Result<()> {
        let mut store = self.store.write().await;
        *store = Some(keywords.clone());
        Ok(())
    }
}
