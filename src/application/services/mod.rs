pub mod messenger;
pub mod ocr;
pub mod parser;
pub mod signature;
