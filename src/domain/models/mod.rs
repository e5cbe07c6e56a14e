pub mod asset;
pub mod message;
pub mod ocr;

pub use asset::{ImageContent, StoredAsset};
pub use message::OutboundMessage;
pub use ocr::OcrDocument;
#[cfg(test)]
pub use ocr::{OcrLine, OcrRegion, OcrWord};
