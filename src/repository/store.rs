//! Whole-file JSON persistence

use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{AppError, AppResult};

/// A JSON document stored in a single file, read and written whole
#[derive(Debug)]
pub struct JsonFile<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for JsonFile<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> JsonFile<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    /// Read the document. A missing or empty file yields `T::default()`.
    pub async fn load(&self) -> AppResult<T> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("{} not found, starting empty", self.path.display());
                return Ok(T::default());
            }
            Err(e) => {
                return Err(AppError::Storage(format!(
                    "failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(T::default());
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            AppError::Storage(format!("malformed data file {}: {}", self.path.display(), e))
        })
    }

    /// Replace the whole document. Writes a sibling temp file then renames it
    /// over the target, so readers never see a partial file.
    pub async fn save(&self, value: &T) -> AppResult<()> {
        let bytes = serde_json::to_vec(value)?;
        let tmp = self.tmp_path();

        tokio::fs::write(&tmp, &bytes).await.map_err(|e| {
            AppError::Storage(format!("failed to write {}: {}", tmp.display(), e))
        })?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            AppError::Storage(format!("failed to replace {}: {}", self.path.display(), e))
        })?;

        tracing::debug!("saved {} ({} bytes)", self.path.display(), bytes.len());
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
