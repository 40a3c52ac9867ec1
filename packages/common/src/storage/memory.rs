use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::error::StorageError;
use super::traits::{BlobStore, StoredBlob, validate_path};

/// In-memory blob store used in tests and for local development wiring.
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, StoredBlob>>,
    public_base_url: String,
}

impl MemoryBlobStore {
    pub fn new(public_base_url: &str) -> Self {
        Self {
            blobs: Mutex::new(HashMap::new()),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Number of blobs currently stored.
    pub fn len(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new("http://localhost:8000/media")
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(
        &self,
        path: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<String, StorageError> {
        validate_path(path)?;
        self.blobs.lock().unwrap().insert(
            path.to_string(),
            StoredBlob {
                data: data.to_vec(),
                content_type: content_type.to_string(),
            },
        );
        Ok(self.public_url(path))
    }

    async fn get(&self, path: &str) -> Result<StoredBlob, StorageError> {
        validate_path(path)?;
        self.blobs
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }

    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        validate_path(path)?;
        Ok(self.blobs.lock().unwrap().contains_key(path))
    }

    async fn delete(&self, path: &str) -> Result<bool, StorageError> {
        validate_path(path)?;
        Ok(self.blobs.lock().unwrap().remove(path).is_some())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.public_base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_get_delete() {
        let store = MemoryBlobStore::default();
        let url = store.put("a/b.png", b"png", "image/png").await.unwrap();
        assert_eq!(url, "http://localhost:8000/media/a/b.png");
        assert!(store.exists("a/b.png").await.unwrap());
        assert_eq!(store.get("a/b.png").await.unwrap().content_type, "image/png");
        assert!(store.delete("a/b.png").await.unwrap());
        assert!(!store.delete("a/b.png").await.unwrap());
    }
}
