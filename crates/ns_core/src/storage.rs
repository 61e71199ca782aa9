use async_trait::async_trait;
use crate::types::KeywordSet;
use crate::Result;

#[async_trait]
pub trait KeywordStorage: Send + Sync {
    /// Load the persisted keyword set, `Ok(None)` if nothing was saved yet
    async fn load(&self) -> Result<Option<KeywordSet>>;

    /// Replace the persisted keyword set
    async fn save(&self, keywords: &KeywordSet) -> Result<()>;
}
