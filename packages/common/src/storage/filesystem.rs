use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use super::error::StorageError;
use super::traits::{BlobStore, StoredBlob, validate_path};

/// Extension of the sidecar file recording a blob's content type.
const CONTENT_TYPE_EXT: &str = "ctype";

/// Filesystem-backed blob store.
///
/// Blobs live under `base_path` mirroring their storage path, with a small
/// sidecar file per blob holding the content type. Public URLs are
/// `{public_base_url}/{path}`; the server exposes the tree through its media
/// route.
pub struct FilesystemBlobStore {
    base_path: PathBuf,
    public_base_url: String,
}

impl FilesystemBlobStore {
    /// Create a new filesystem blob store rooted at `base_path`.
    pub async fn new(base_path: PathBuf, public_base_url: &str) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self {
            base_path,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn blob_path(&self, path: &str) -> PathBuf {
        self.base_path.join(path)
    }

    fn sidecar_path(&self, path: &str) -> PathBuf {
        self.base_path.join(format!("{path}.{CONTENT_TYPE_EXT}"))
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl BlobStore for FilesystemBlobStore {
    async fn put(
        &self,
        path: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<String, StorageError> {
        validate_path(path)?;

        let blob_path = self.blob_path(path);
        if let Some(parent) = blob_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Write to a temp file first so a crashed upload never leaves a
        // half-written blob at a public path.
        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&temp_path, &blob_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        fs::write(self.sidecar_path(path), content_type.as_bytes()).await?;

        Ok(self.public_url(path))
    }

    async fn get(&self, path: &str) -> Result<StoredBlob, StorageError> {
        validate_path(path)?;

        let data = match fs::read(self.blob_path(path)).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(path.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let content_type = match fs::read_to_string(self.sidecar_path(path)).await {
            Ok(ct) => ct,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                "application/octet-stream".to_string()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(StoredBlob { data, content_type })
    }

    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        validate_path(path)?;
        Ok(fs::try_exists(self.blob_path(path)).await?)
    }

    async fn delete(&self, path: &str) -> Result<bool, StorageError> {
        validate_path(path)?;

        let _ = fs::remove_file(self.sidecar_path(path)).await;
        match fs::remove_file(self.blob_path(path)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.public_base_url, path)
    }
}
