use crate::core::store::{DocumentStore, StoreError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

/// JSON file holding one whole document, e.g. `points.json` or `settings.json`.
///
/// The file is created as `{}` on first load, and an existing file is never
/// replaced by that. Saves are pretty-printed with
/// two-space indentation and go through a sibling temp file plus rename, so a
/// crash mid-write leaves the previous document on disk.
pub struct JsonFileStore<D> {
    path: PathBuf,
    _document: PhantomData<fn() -> D>,
}

impl<D> JsonFileStore<D> {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            _document: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn ensure_parent(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    /// Create the file as `{}` unless something already exists at the path.
    /// A concurrent save that lands first wins; its content is never
    /// overwritten.
    async fn create_if_missing(&self) -> Result<(), StoreError> {
        self.ensure_parent().await?;

        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        file.write_all(b"{}").await?;
        file.flush().await?;

        tracing::info!(path = %self.path.display(), "Created empty store file");
        Ok(())
    }
}

#[async_trait]
impl<D> DocumentStore<D> for JsonFileStore<D>
where
    D: Serialize + DeserializeOwned + Send + Sync,
{
    async fn load(&self) -> Result<D, StoreError> {
        self.create_if_missing().await?;

        let text = fs::read_to_string(&self.path).await?;
        // Freshly created by a concurrent load, before its `{}` landed
        if text.trim().is_empty() {
            return Ok(serde_json::from_str("{}")?);
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn save(&self, document: &D) -> Result<(), StoreError> {
        self.ensure_parent().await?;

        let text = serde_json::to_string_pretty(document)?;
        let temp = self.temp_path();
        fs::write(&temp, text).await?;
        fs::rename(&temp, &self.path).await?;
        Ok(())
    }
}
