use crate::context::assemble_context;
use crate::prompt::{build_messages, build_prompt, TEMPERATURE, TOP_K};
use domain::error::RagError;
use domain::models::RagAnswer;
use domain::ports::{Embedder, LanguageModel, VectorIndex};
use shared::telemetry::Telemetry;
use tracing::{debug, info};

/// Answers questions against a vector index and a chat model.
///
/// The collaborators are built once at startup and only read afterwards, so a
/// single service can serve any number of questions.
pub struct RagService {
    embedder: Box<dyn Embedder>,
    index: Box<dyn VectorIndex>,
    model: Box<dyn LanguageModel>,
}

impl RagService {
    pub fn new(
        embedder: Box<dyn Embedder>,
        index: Box<dyn VectorIndex>,
        model: Box<dyn LanguageModel>,
    ) -> Self {
        Self {
            embedder,
            index,
            model,
        }
    }

    pub async fn ask(&self, question: &str) -> Result<RagAnswer, RagError> {
        if question.trim().is_empty() {
            return Err(RagError::EmptyQuery);
        }
        let telemetry = Telemetry::new();

        let embedding = self
            .embedder
            .encode(question)
            .await
            .map_err(RagError::Embedding)?;
        debug!(dimension = embedding.len(), "question embedded");

        let matches = self
            .index
            .query(&embedding, TOP_K, true)
            .await
            .map_err(RagError::Retrieval)?;
        debug!(matches = matches.len(), "index queried");

        let assembled = assemble_context(&matches);
        let prompt = build_prompt(&assembled.chunks, question);
        debug!(chunks = assembled.chunks.len(), prompt_len = prompt.len(), "prompt built");

        let completion = self
            .model
            .complete(&build_messages(prompt), TEMPERATURE)
            .await
            .map_err(RagError::Generation)?;

        let answer = RagAnswer {
            question: question.to_string(),
            answer: completion.trim().to_string(),
            citations: assembled.citations,
        };
        info!(
            elapsed_ms = telemetry.elapsed_ms() as u64,
            citations = answer.citations.len(),
            refusal = answer.is_refusal(),
            "question answered"
        );
        Ok(answer)
    }
}
