use domain::message::Message;

pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";
pub const SYSTEM_MESSAGE: &str = "You are a helpful assistant.";
pub const TOP_K: usize = 5;
pub const TEMPERATURE: f32 = 0.2;

/// Joins chunks in rank order. An empty slice gives an empty context section.
pub fn join_context(chunks: &[String]) -> String {
    chunks.join(CONTEXT_SEPARATOR)
}

/// Query and retrieved text are inserted verbatim, without escaping.
pub fn build_prompt(chunks: &[String], query: &str) -> String {
    let context = join_context(chunks);
    format!(
        "You are a helpful assistant answering based on historical texts and scientific documents.

Answer the following question using only the information in the provided context.
If the answer cannot be found, say \"I don't know\" instead of making something up.

### Context:
{context}

### Question:
{query}

### Answer:"
    )
}

pub fn build_messages(prompt: String) -> Vec<Message> {
    vec![Message::system(SYSTEM_MESSAGE), Message::user(prompt)]
}
