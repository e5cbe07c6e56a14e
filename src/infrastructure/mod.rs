pub mod http;
pub mod messaging;
pub mod ocr;
pub mod storage;
