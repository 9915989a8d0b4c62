use anyhow::Context;
use application::rag_service::RagService;
use clap::Parser;
use infrastructure::config::Config;
use infrastructure::embedder::OllamaEmbedder;
use infrastructure::openai_client::OpenAiClient;
use infrastructure::pinecone_client::PineconeIndex;
use presentation::cli::{Cli, CliApp};
use shared::telemetry::init_tracing;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load()?;
    let service = build_service(&config).await?;

    let app = CliApp::new(service);
    app.run(cli).await
}

async fn build_service(config: &Config) -> anyhow::Result<RagService> {
    let embedder = OllamaEmbedder::new(&config.ollama_base_url, &config.embedding_model);

    let index = match &config.pinecone_host {
        Some(host) => PineconeIndex::with_host(host, &config.pinecone_api_key),
        None => PineconeIndex::connect(
            &config.pinecone_controller_url,
            &config.pinecone_api_key,
            &config.pinecone_index_name,
            &config.pinecone_env,
        )
        .await
        .with_context(|| format!("could not connect to index {}", config.pinecone_index_name))?,
    };

    let model = OpenAiClient::new(
        &config.openai_base_url,
        &config.openai_api_key,
        &config.openai_model,
    );
    info!(
        embedding_model = embedder.model(),
        chat_model = model.model(),
        index_host = index.host(),
        "services ready"
    );

    Ok(RagService::new(
        Box::new(embedder),
        Box::new(index),
        Box::new(model),
    ))
}
