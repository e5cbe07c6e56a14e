pub mod dispatcher;
pub mod image_pipeline;
pub mod text_handler;
