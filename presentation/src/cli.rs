use application::rag_service::RagService;
use clap::Parser;
use colored::Colorize;
use domain::error::RagError;
use domain::models::RagAnswer;
use shared::input::{ask_question, is_exit_command};
use shared::types::Result;
use tracing::debug;

pub const TITLE: &str = "Archaeometry";
pub const QUESTION_PROMPT: &str = "Ask a question";
pub const QUESTION_PLACEHOLDER: &str = "e.g., How did Thales predict solar eclipses?";

#[derive(Parser, Debug)]
#[command(name = "archaeometry")]
#[command(about = "Answer questions from historical and scientific documents", long_about = None)]
pub struct Cli {
    /// Log request details to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Question to answer once; without it an interactive prompt starts
    #[arg(trailing_var_arg = true)]
    pub question: Vec<String>,
}

impl Cli {
    pub fn question_text(&self) -> Option<String> {
        let text = self.question.join(" ");
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Markdown for one answer: the answer block, then citations when they apply.
pub fn render_markdown(answer: &RagAnswer) -> String {
    let mut out = format!("**Answer:**\n{}\n", answer.answer);
    let citations = answer.visible_citations();
    if !citations.is_empty() {
        out.push_str("\n**Citations:**\n");
        for cite in citations {
            out.push_str(&format!("- {}\n", cite));
        }
    }
    out
}

fn stage_hint(err: &RagError) -> &'static str {
    match err {
        RagError::EmptyQuery => "Type a question first.",
        RagError::Embedding(_) => "Check that the embedding server (OLLAMA_BASE_URL) is running and has the model.",
        RagError::Retrieval(_) => "Check PINECONE_API_KEY, PINECONE_INDEX_NAME and network access to the index.",
        RagError::Generation(_) => "Check OPENAI_API_KEY, the model name and your rate limits.",
    }
}

/// One-line description of a failed request, naming the stage that failed.
pub fn describe_error(err: &RagError) -> String {
    format!("{} failed: {}\n{}", err.stage(), err, stage_hint(err))
}

pub struct CliApp {
    service: RagService,
}

impl CliApp {
    pub fn new(service: RagService) -> Self {
        Self { service }
    }

    pub async fn run(&self, cli: Cli) -> Result<()> {
        match cli.question_text() {
            Some(question) => {
                let answer = self.answer(&question).await?;
                println!("{}", render_markdown(&answer));
                Ok(())
            }
            None => self.interactive().await,
        }
    }

    pub async fn answer(&self, question: &str) -> std::result::Result<RagAnswer, RagError> {
        eprintln!("{}", "Thinking...".cyan());
        self.service.ask(question).await
    }

    async fn interactive(&self) -> Result<()> {
        println!("{}", TITLE.bold());
        println!("Type 'exit' to quit.");
        loop {
            let input = ask_question(QUESTION_PROMPT, QUESTION_PLACEHOLDER)?;
            if input.trim().is_empty() {
                continue;
            }
            if is_exit_command(&input) {
                break;
            }

            match self.answer(&input).await {
                Ok(answer) => println!("\n{}", render_markdown(&answer)),
                Err(err) => {
                    debug!(error = ?err, "request failed");
                    eprintln!("{}", describe_error(&err).red());
                }
            }
        }
        Ok(())
    }
}
