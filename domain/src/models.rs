use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Placeholder used when a stored record carries no `text` field.
pub const MISSING_TEXT: &str = "[No text found]";
pub const MISSING_SOURCE: &str = "?";

/// Lower-cased prefix the prompt asks the model to use when it cannot answer.
pub const REFUSAL_PREFIX: &str = "i don't know";

/// One record returned by the vector index, with its metadata already decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalMatch {
    pub id: String,
    pub score: f32,
    pub text: String,
    pub source: String,
    pub page: i64,
}

impl RetrievalMatch {
    /// Decodes the loosely typed metadata map of an index record.
    ///
    /// Missing or null fields fall back to `MISSING_TEXT`, `MISSING_SOURCE` and page 0.
    /// Nothing here fails: bad metadata degrades to the defaults.
    pub fn from_metadata(id: impl Into<String>, score: f32, metadata: Option<&Map<String, Value>>) -> Self {
        let field = |name: &str| metadata.and_then(|m| m.get(name)).filter(|v| !v.is_null());

        Self {
            id: id.into(),
            score,
            text: field("text").map(value_to_string).unwrap_or_else(|| MISSING_TEXT.to_string()),
            source: field("source")
                .map(value_to_string)
                .unwrap_or_else(|| MISSING_SOURCE.to_string()),
            page: normalize_page(field("page")),
        }
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Page numbers come back as floats (`42.0`) or numeric strings (`"3.0"`).
/// Parse as a float, then truncate toward zero.
pub fn normalize_page(value: Option<&Value>) -> i64 {
    let parsed = match value {
        None | Some(Value::Null) => return 0,
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match parsed {
        Some(page) if page.is_finite() => page.trunc() as i64,
        _ => {
            warn!(?value, "unreadable page number in match metadata, using 0");
            0
        }
    }
}

/// Formatted context chunks and citations, index-aligned with each other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssembledContext {
    pub chunks: Vec<String>,
    pub citations: Vec<String>,
}

impl AssembledContext {
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// Result of one question: the trimmed answer plus the citations it was grounded on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RagAnswer {
    pub question: String,
    pub answer: String,
    pub citations: Vec<String>,
}

impl RagAnswer {
    pub fn is_refusal(&self) -> bool {
        self.answer.to_lowercase().starts_with(REFUSAL_PREFIX)
    }

    /// Citations worth showing: none for a refusal, otherwise all of them in rank order.
    pub fn visible_citations(&self) -> &[String] {
        if self.is_refusal() {
            &[]
        } else {
            &self.citations
        }
    }

    pub fn shows_citations(&self) -> bool {
        !self.visible_citations().is_empty()
    }
}
