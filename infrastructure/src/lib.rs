pub mod config;
pub mod embedder;
pub mod openai_client;
pub mod pinecone_client;
pub mod search;
