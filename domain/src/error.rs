use thiserror::Error;

/// Failures of a single question-answering request, one variant per collaborator.
#[derive(Debug, Error)]
pub enum RagError {
    #[error("question is empty")]
    EmptyQuery,

    #[error("embedding the question failed: {0:#}")]
    Embedding(#[source] anyhow::Error),

    #[error("vector index query failed: {0:#}")]
    Retrieval(#[source] anyhow::Error),

    #[error("language model request failed: {0:#}")]
    Generation(#[source] anyhow::Error),
}

impl RagError {
    /// Short label for the failing stage, used by the presenter.
    pub fn stage(&self) -> &'static str {
        match self {
            RagError::EmptyQuery => "input",
            RagError::Embedding(_) => "embedding",
            RagError::Retrieval(_) => "retrieval",
            RagError::Generation(_) => "generation",
        }
    }
}
