use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Single-use credential for answering one inbound event.
///
/// Not `Clone`: sending a reply consumes the token.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ReplyToken(String);

impl ReplyToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub const UNKNOWN_EXTENSION: &str = "unknown";

/// File extension for a content type; unsupported types map to
/// [`UNKNOWN_EXTENSION`] so the bytes can still be stored.
pub fn extension_for(content_type: Option<&str>) -> &'static str {
    let essence = content_type
        .and_then(|value| value.split(';').next())
        .map(|value| value.trim().to_ascii_lowercase())
        .unwrap_or_default();

    match essence.as_str() {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/tiff" => "tiff",
        "image/vnd.wap.wbmp" => "wbmp",
        "image/x-icon" => "ico",
        "image/x-jng" => "jng",
        "image/x-ms-bmp" => "bmp",
        "image/svg+xml" => "svg",
        "image/webp" => "webp",
        _ => UNKNOWN_EXTENSION,
    }
}

/// Random blob name: a v4 UUID plus the inferred extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobFileName(String);

impl BlobFileName {
    pub fn generate(content_type: Option<&str>) -> Self {
        Self(format!("{}.{}", Uuid::new_v4(), extension_for(content_type)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlobFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
