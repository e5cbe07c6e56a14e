use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;
use tracing::warn;

use crate::domain::repositories::BlobStore;

#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

/// Process-local blob store. URLs it returns are not reachable from
/// outside the process.
#[derive(Default)]
pub struct InMemoryBlobStore {
    public_endpoint: String,
    blobs: Arc<RwLock<HashMap<(String, String), StoredBlob>>>,
}

impl InMemoryBlobStore {
    pub fn new(public_endpoint: impl Into<String>) -> Self {
        Self {
            public_endpoint: public_endpoint.into(),
            blobs: Arc::default(),
        }
    }

    pub async fn get(&self, container: &str, file_name: &str) -> Option<StoredBlob> {
        let blobs = self.blobs.read().await;
        blobs
            .get(&(container.to_string(), file_name.to_string()))
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn save(
        &self,
        container: &str,
        file_name: &str,
        bytes: Bytes,
        content_type: Option<&str>,
    ) -> anyhow::Result<String> {
        let mut blobs = self.blobs.write().await;
        let key = (container.to_string(), file_name.to_string());
        if blobs.contains_key(&key) {
            warn!(container, file_name, "overwriting in-memory blob");
        }
        blobs.insert(
            key,
            StoredBlob {
                bytes,
                content_type: content_type.map(str::to_string),
            },
        );

        Ok(format!(
            "{}/{}/{}",
            self.public_endpoint.trim_end_matches('/'),
            container,
            file_name
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn saves_and_builds_public_url() {
        let store = InMemoryBlobStore::new("http://localhost:10000/devstoreaccount1/");

        let url = store
            .save("images", "a.png", Bytes::from_static(b"png"), Some("image/png"))
            .await
            .unwrap();

        assert_eq!(url, "http://localhost:10000/devstoreaccount1/images/a.png");
        let blob = store.get("images", "a.png").await.unwrap();
        assert_eq!(blob.bytes, Bytes::from_static(b"png"));
        assert_eq!(blob.content_type.as_deref(), Some("image/png"));
    }
}
