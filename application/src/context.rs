use domain::models::{AssembledContext, RetrievalMatch};

pub fn format_chunk(source: &str, page: i64, text: &str) -> String {
    format!("(Source: {}, Page: {})\n{}", source, page, text)
}

pub fn format_citation(source: &str, page: i64) -> String {
    format!("{}, page {}", source, page)
}

/// Turns ranked matches into context chunks and citations.
/// Matches whose text is blank after trimming contribute to neither list.
pub fn assemble_context(matches: &[RetrievalMatch]) -> AssembledContext {
    let mut assembled = AssembledContext::default();

    for m in matches {
        let text = m.text.trim();
        if text.is_empty() {
            continue;
        }
        assembled.chunks.push(format_chunk(&m.source, m.page, text));
        assembled.citations.push(format_citation(&m.source, m.page));
    }

    assembled
}
