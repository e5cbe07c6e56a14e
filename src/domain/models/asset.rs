use bytes::Bytes;

use crate::domain::value_objects::BlobFileName;

/// Binary content fetched from the platform for one image event.
#[derive(Debug, Clone)]
pub struct ImageContent {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

/// Image bytes persisted to blob storage. Never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAsset {
    pub url: String,
    pub file_name: BlobFileName,
    pub content_type: Option<String>,
}
