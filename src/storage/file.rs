//! File-backed storage backend.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::{KeyValueStorage, StorageError};

/// One file per key under a root directory.
///
/// Writes go through a temporary file and a rename so a crash mid-write
/// leaves the previous value intact rather than a truncated one.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    root: PathBuf,
}

impl JsonFileStorage {
    /// Create a backend rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the directory cannot be created.
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();

        fs::create_dir_all(&root).await.map_err(StorageError::Io)?;

        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        // Keys become file names; reject anything that could escape the root.
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        Ok(self.root.join(format!("{key}.json")))
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl KeyValueStorage for JsonFileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;

        match fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");

        fs::write(&tmp, value).await.map_err(StorageError::Io)?;
        fs::rename(&tmp, &path).await.map_err(StorageError::Io)?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn set_then_get_round_trips() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = JsonFileStorage::new(dir.path()).await?;

        storage.set("cart", r#"[{"quantity":1}]"#).await?;

        assert_eq!(
            storage.get("cart").await?,
            Some(r#"[{"quantity":1}]"#.to_string())
        );

        Ok(())
    }

    #[tokio::test]
    async fn get_missing_key_returns_none() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = JsonFileStorage::new(dir.path()).await?;

        assert_eq!(storage.get("cart").await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn value_survives_reopening_the_root() -> TestResult {
        let dir = tempfile::tempdir()?;

        {
            let storage = JsonFileStorage::new(dir.path()).await?;
            storage.set("points", "42").await?;
        }

        let reopened = JsonFileStorage::new(dir.path()).await?;

        assert_eq!(reopened.get("points").await?, Some("42".to_string()));

        Ok(())
    }

    #[tokio::test]
    async fn remove_missing_key_is_not_an_error() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = JsonFileStorage::new(dir.path()).await?;

        storage.remove("cart").await?;

        Ok(())
    }

    #[tokio::test]
    async fn traversal_keys_are_rejected() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = JsonFileStorage::new(dir.path()).await?;

        let result = storage.set("../escape", "x").await;

        assert!(
            matches!(result, Err(StorageError::InvalidKey(_))),
            "expected InvalidKey, got {result:?}"
        );

        Ok(())
    }
}
