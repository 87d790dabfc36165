pub mod ocr;
pub mod provider;
pub mod screen_model;
pub mod store;
