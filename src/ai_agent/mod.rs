pub mod data;
pub mod documents;
pub mod error;
pub mod extractor;
pub mod llm;
pub mod router;
pub mod utils;
