use async_trait::async_trait;
use bytes::Bytes;

/// Durable storage for image assets.
///
/// Implementations create `container` when it does not exist yet and make
/// stored objects publicly readable, since the returned URL is sent to chat
/// users as-is.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Persists `bytes` and returns the public URL of the new object.
    /// `content_type` is recorded on the object only when present.
    async fn save(
        &self,
        container: &str,
        file_name: &str,
        bytes: Bytes,
        content_type: Option<&str>,
    ) -> anyhow::Result<String>;
}
