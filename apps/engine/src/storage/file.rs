#![allow(dead_code)]

//! File-backed store: one JSON-bearing file per key under a configured
//! directory. Used by the binary so a returning user resumes where they
//! left off.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::errors::AppError;
use crate::storage::KeyValueStore;

pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Creates the backing directory if it does not exist yet.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, AppError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)
            .map_err(|e| AppError::Storage(format!("cannot create {}: {e}", dir.display())))?;
        Ok(JsonFileStore { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are slot names like "cv-sob-medida-draft"; anything outside
        // [a-zA-Z0-9-_] is mapped to '_' so a key can never escape the dir.
        let sanitized: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{sanitized}.json"))
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Storage(format!(
                "cannot read {}: {e}",
                path.display()
            ))),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let path = self.path_for(key);
        debug!("writing slot '{key}' to {}", path.display());
        tokio::fs::write(&path, value)
            .await
            .map_err(|e| AppError::Storage(format!("cannot write {}: {e}", path.display())))
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        let path = self.path_for(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!(
                "cannot remove {}: {e}",
                path.display()
            ))),
        }
    }
}
