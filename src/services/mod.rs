pub mod ai_service;
pub mod image_service;
pub mod parser;
pub mod prompt;
pub mod quiz_service;
pub mod retry;
