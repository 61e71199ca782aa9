use std::sync::Arc;
use ns_core::{KeywordSet, KeywordStorage, Result};
use tracing::{debug, info, warn};

/// The session's keyword list, written back to storage after every change.
pub struct KeywordStore {
    keywords: KeywordSet,
    storage: Arc<dyn KeywordStorage>,
}

impl KeywordStore {
    /// Loads the saved keywords. Missing or unreadable state starts an empty set.
    pub async fn load(storage: Arc<dyn KeywordStorage>) -> Self {
        let keywords = match storage.load().await {
            Ok(Some(keywords)) => {
                info!("🔑 Loaded {} saved keywords", keywords.len());
                keywords
            }
            Ok(None) => KeywordSet::new(),
            Err(e) => {
                warn!("⚠️ Ignoring unreadable saved keywords: {}", e);
                KeywordSet::new()
            }
        };
        Self { keywords, storage }
    }

    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    /// Returns `Ok(false)` without touching storage when the trimmed keyword
    /// is empty or already present. A failed save keeps the new keyword in memory.
    pub async fn add(&mut self, keyword: &str) -> Result<bool> {
        if !self.keywords.insert(keyword) {
            debug!("Keyword '{}' ignored (blank or duplicate)", keyword.trim());
            return Ok(false);
        }
        self.persist().await?;
        Ok(true)
    }

    pub async fn remove(&mut self, keyword: &str) -> Result<bool> {
        if !self.keywords.remove(keyword) {
            return Ok(false);
        }
        self.persist().await?;
        Ok(true)
    }

    pub async fn persist(&self) -> Result<()> {
        self.storage.save(&self.keywords).await
    }
}
