use dotenvy::dotenv;
use std::env;
use thiserror::Error;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4";
pub const DEFAULT_PINECONE_CONTROLLER_URL: &str = "https://api.pinecone.io";
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_EMBEDDING_MODEL: &str = "jeffh/intfloat-multilingual-e5-large:f16";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting {0} (set it in the environment or in .env)")]
    Missing(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub pinecone_api_key: String,
    pub pinecone_env: String,
    pub pinecone_index_name: String,
    pub pinecone_host: Option<String>,
    pub pinecone_controller_url: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub ollama_base_url: String,
    pub embedding_model: String,
}

impl Config {
    /// Reads `.env` (if present) and then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &'static str| optional(key).ok_or(ConfigError::Missing(key));
        let with_default = |key: &str, default: &str| optional(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            pinecone_api_key: required("PINECONE_API_KEY")?,
            pinecone_env: required("PINECONE_ENV")?,
            pinecone_index_name: required("PINECONE_INDEX_NAME")?,
            pinecone_host: optional("PINECONE_HOST"),
            pinecone_controller_url: with_default("PINECONE_CONTROLLER_URL", DEFAULT_PINECONE_CONTROLLER_URL),
            openai_api_key: required("OPENAI_API_KEY")?,
            openai_base_url: with_default("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            openai_model: with_default("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
            ollama_base_url: with_default("OLLAMA_BASE_URL", DEFAULT_OLLAMA_BASE_URL),
            embedding_model: with_default("EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL),
        })
    }
}
