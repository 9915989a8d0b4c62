use application::prompt::CONTEXT_SEPARATOR;
use application::rag_service::RagService;
use infrastructure::search::InMemoryIndex;
use presentation::cli::render_markdown;
use serde_json::json;
use tests::{metadata, LookupEmbedder, ScriptedModel};

const THALES: &str = "How did Thales predict solar eclipses?";

fn library() -> InMemoryIndex {
    InMemoryIndex::new(3)
        .with_record(
            "thales-1",
            vec![1.0, 0.0, 0.0],
            metadata(json!({
                "text": "Thales used Babylonian records...",
                "source": "HistoryOfScience.pdf",
                "page": 42.0
            })),
        )
        .unwrap()
        .with_record(
            "blank",
            vec![0.9, 0.1, 0.0],
            metadata(json!({"text": "   ", "source": "Scan.pdf", "page": "3.0"})),
        )
        .unwrap()
        .with_record(
            "herodotus",
            vec![0.6, 0.4, 0.0],
            metadata(json!({
                "text": "Herodotus reports the eclipse ended a battle.",
                "source": "Histories.pdf",
                "page": "7.0"
            })),
        )
        .unwrap()
        .with_record(
            "stonehenge",
            vec![0.0, 0.0, 1.0],
            metadata(json!({"text": "Sarsen stones were raised.", "source": "Megaliths.pdf"})),
        )
        .unwrap()
}

#[tokio::test]
async fn answers_with_citations_in_rank_order() {
    let model = ScriptedModel::new("\nHe compared the sky with Babylonian eclipse records.\n");
    let service = RagService::new(
        Box::new(LookupEmbedder::new(&[(THALES, vec![1.0, 0.05, 0.0])])),
        Box::new(library()),
        Box::new(model.clone()),
    );

    let answer = service.ask(THALES).await.unwrap();
    assert_eq!(answer.answer, "He compared the sky with Babylonian eclipse records.");
    assert_eq!(
        answer.citations,
        vec![
            "HistoryOfScience.pdf, page 42",
            "Histories.pdf, page 7",
            "Megaliths.pdf, page 0",
        ]
    );

    let prompt = model.last_user_prompt().unwrap();
    assert!(prompt.contains(THALES));
    let context = prompt
        .split("### Context:\n")
        .nth(1)
        .and_then(|rest| rest.split("\n\n### Question:").next())
        .unwrap();
    let chunks: Vec<&str> = context.split(CONTEXT_SEPARATOR).collect();
    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0], "(Source: HistoryOfScience.pdf, Page: 42)\nThales used Babylonian records...");
    assert!(!prompt.contains("Scan.pdf"));

    let rendered = render_markdown(&answer);
    assert!(rendered.contains(
        "**Citations:**\n- HistoryOfScience.pdf, page 42\n- Histories.pdf, page 7\n- Megaliths.pdf, page 0\n"
    ));
}

#[tokio::test]
async fn refusal_renders_no_citations() {
    let service = RagService::new(
        Box::new(LookupEmbedder::new(&[(THALES, vec![1.0, 0.0, 0.0])])),
        Box::new(library()),
        Box::new(ScriptedModel::new("I don't know.")),
    );

    let answer = service.ask(THALES).await.unwrap();
    assert!(!answer.citations.is_empty());
    assert_eq!(render_markdown(&answer), "**Answer:**\nI don't know.\n");
}

#[tokio::test]
async fn empty_index_still_builds_a_prompt() {
    let model = ScriptedModel::new("Thales was from Miletus.");
    let service = RagService::new(
        Box::new(LookupEmbedder::new(&[(THALES, vec![1.0, 0.0, 0.0])])),
        Box::new(InMemoryIndex::new(3)),
        Box::new(model.clone()),
    );

    let answer = service.ask(THALES).await.unwrap();
    assert!(answer.citations.is_empty());
    assert!(!render_markdown(&answer).contains("Citations"));
    assert!(model
        .last_user_prompt()
        .unwrap()
        .contains("### Context:\n\n\n### Question:\nHow did Thales predict solar eclipses?"));
}

#[tokio::test]
async fn dimension_mismatch_is_a_retrieval_failure() {
    let service = RagService::new(
        Box::new(LookupEmbedder::new(&[(THALES, vec![1.0, 0.0])])),
        Box::new(library()),
        Box::new(ScriptedModel::new("unused")),
    );

    let err = service.ask(THALES).await.unwrap_err();
    assert_eq!(err.stage(), "retrieval");
}
