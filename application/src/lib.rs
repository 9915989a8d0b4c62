pub mod context;
pub mod prompt;
pub mod rag_service;
