use ns_core::{KeywordStorage, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub mod backends;

pub use backends::*;

pub trait StorageBackend: Send + Sync {
    fn get_error_message() -> &'static str;
    fn kind(&self) -> &'static str;
}

/// Build a keyword storage backend by name (`file` or `memory`).
pub async fn create_storage(kind: &str, path: Option<&Path>) -> Result<Arc<dyn KeywordStorage>> {
    match kind {
        "memory" => {
            let storage = MemoryStorage::new();
            info!("💾 Keyword storage ready (using {})", storage.kind());
            Ok(Arc::new(storage))
        }
        "file" => {
            let path = path.unwrap_or_else(|| Path::new(DEFAULT_KEYWORDS_FILE));
            let storage = FileStorage::new(path).await.map_err(|e| {
                ns_core::Error::Storage(format!("{}: {}", FileStorage::get_error_message(), e))
            })?;
            info!("💾 Keyword storage ready (using {} at {})", storage.kind(), storage.path().display());
            Ok(Arc::new(storage))
        }
        other => Err(ns_core::Error::Storage(format!(
            "Unknown storage backend '{}' (expected 'file' or 'memory')",
            other
        ))),
    }
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_storage, StorageBackend};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_storage() {
        let storage = create_storage("memory", None).await.unwrap();
        assert!(storage.load().await.unwrap().is_none());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keywords.json");
        assert!(create_storage("file", Some(path.as_path())).await.is_ok());

        assert!(create_storage("qdrant", None).await.is_err());
    }
}
