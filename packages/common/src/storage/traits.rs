use async_trait::async_trait;

use super::error::StorageError;

/// A blob retrieved from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Path-addressed blob storage that issues publicly resolvable URLs.
///
/// Paths are slash-separated, relative, and scoped by the caller (e.g.
/// `images/<user>/<file>`). A blob written under a path is reachable at the
/// URL returned by [`BlobStore::put`] until it is deleted.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store bytes under `path` and return the blob's public URL.
    ///
    /// Overwrites any blob previously stored at the same path.
    async fn put(
        &self,
        path: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<String, StorageError>;

    /// Retrieve the bytes and content type stored under `path`.
    async fn get(&self, path: &str) -> Result<StoredBlob, StorageError>;

    /// Check whether a blob exists at `path`.
    async fn exists(&self, path: &str) -> Result<bool, StorageError>;

    /// Delete the blob at `path`.
    ///
    /// Returns `true` if the blob was deleted, `false` if it did not exist.
    async fn delete(&self, path: &str) -> Result<bool, StorageError>;

    /// The public URL a blob at `path` is (or would be) served under.
    fn public_url(&self, path: &str) -> String;
}

/// Validates a storage path before it is mapped onto a backend location.
pub(crate) fn validate_path(path: &str) -> Result<(), StorageError> {
    if path.is_empty() {
        return Err(StorageError::InvalidPath("path cannot be empty".into()));
    }
    if path.len() > 512 {
        return Err(StorageError::InvalidPath(
            "path exceeds maximum length of 512 characters".into(),
        ));
    }
    if path.contains('\0') || path.chars().any(|c| c.is_ascii_control()) {
        return Err(StorageError::InvalidPath(
            "path must not contain control characters".into(),
        ));
    }
    if path.contains('\\') {
        return Err(StorageError::InvalidPath(
            "path must not contain backslashes".into(),
        ));
    }
    if path.starts_with('/') || path.ends_with('/') || path.contains("//") {
        return Err(StorageError::InvalidPath(
            "path must be relative with non-empty segments".into(),
        ));
    }
    if path.split('/').any(|segment| segment == "..") {
        return Err(StorageError::InvalidPath(
            "path must not contain '..' traversal".into(),
        ));
    }
    Ok(())
}
