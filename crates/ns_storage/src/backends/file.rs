use async_trait::async_trait;
use ns_core::{KeywordSet, KeywordStorage, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;
use crate::StorageBackend;

pub const DEFAULT_KEYWORDS_FILE: &str = "keywords.json";

/// Persists the keyword set as a JSON array of strings in a single file.
///
/// Writes go to a sibling temp file which is then renamed over the target,
/// so a crash mid-write leaves the previous set intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub async fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                ns_core::Error::Storage(format!("Failed to create keyword directory {}: {}", parent.display(), e))
            })?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StorageBackend for FileStorage {
    fn get_error_message() -> &'static str {
        "Keyword file should be readable and writable"
    }

    fn kind(&self) -> &'static str {
        "file"
    }
}

#[async_trait]
impl KeywordStorage for FileStorage {
    async fn load(&self) -> Result<Option<KeywordSet>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No keyword file at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let keywords: KeywordSet = serde_json::from_str(&raw)?;
        debug!("Loaded {} keywords from {}", keywords.len(), self.path.display());
        Ok(Some(keywords))
    }

    async fn save(&self, keywords: &KeywordSet) -> Result<()> {
        let json = serde_json::to_string(keywords)?;
        let temp = self.temp_path();
        tokio::fs::write(&temp, json).await?;
        tokio::fs::rename(&temp, &self.path).await?;
        debug!("Saved {} keywords to {}", keywords.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_loads_as_none() {
        let temp_dir = tempdir().unwrap();
        let storage = FileStorage::new(temp_dir.path().join("keywords.json")).await.unwrap();
        assert!(storage.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_round_trip() {
        let temp_dir = tempdir().unwrap();
        let storage = FileStorage::new(temp_dir.path().join("nested/keywords.json")).await.unwrap();

        for keywords in [
            KeywordSet::new(),
            ["Fed"].into_iter().collect::<KeywordSet>(),
            ["Fed", "inflation", "ECB", "oil prices"].into_iter().collect(),
        ] {
            storage.save(&keywords).await.unwrap();
            assert_eq!(storage.load().await.unwrap(), Some(keywords));
        }

        let raw = std::fs::read_to_string(storage.path()).unwrap();
        assert_eq!(raw, r#"["Fed","inflation","ECB","oil prices"]"#);
        assert!(!storage.temp_path().exists());
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("keywords.json");
        std::fs::write(&path, "{not json").unwrap();

        let storage = FileStorage::new(&path).await.unwrap();
        let err = storage.load().await.unwrap_err();
        assert!(matches!(err, ns_core::Error::Serialization(_)));
    }
}
