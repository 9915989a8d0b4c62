use anyhow::{anyhow, Context};
use async_trait::async_trait;
use domain::models::RetrievalMatch;
use domain::ports::VectorIndex;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shared::types::Result;
use std::sync::Arc;
use tracing::{debug, info, warn};

const API_VERSION: &str = "2024-07";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<RawMatch>,
}

#[derive(Deserialize)]
struct RawMatch {
    #[serde(default)]
    id: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
struct IndexDescription {
    host: String,
    #[serde(default)]
    dimension: Option<usize>,
    #[serde(default)]
    spec: Value,
}

impl IndexDescription {
    /// Region of a serverless index, or environment of a pod index.
    fn location(&self) -> Option<&str> {
        self.spec
            .pointer("/serverless/region")
            .or_else(|| self.spec.pointer("/pod/environment"))
            .and_then(Value::as_str)
    }
}

/// Connection to one Pinecone index, resolved once and reused for every query.
#[derive(Clone)]
pub struct PineconeIndex {
    client: Arc<Client>,
    api_key: String,
    host: String,
    dimension: Option<usize>,
}

impl PineconeIndex {
    /// Looks the index up through the control plane to learn its data-plane host
    /// and dimension.
    pub async fn connect(
        controller_url: &str,
        api_key: &str,
        index_name: &str,
        environment: &str,
    ) -> Result<Self> {
        let client = Client::new();
        let url = format!("{}/indexes/{}", controller_url.trim_end_matches('/'), index_name);
        let response = with_auth(client.get(&url), api_key)
            .send()
            .await
            .with_context(|| format!("failed contacting Pinecone at {}", controller_url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "describing index {} failed with {}: {}",
                index_name,
                status,
                body.trim()
            ));
        }
        let description: IndexDescription = response
            .json()
            .await
            .context("Pinecone sent an unreadable index description")?;

        if let Some(location) = description.location() {
            if location != environment {
                warn!(
                    index = index_name,
                    configured = environment,
                    actual = location,
                    "index lives in a different environment than configured"
                );
            }
        }
        info!(index = index_name, host = %description.host, dimension = ?description.dimension, "connected to index");

        Ok(Self {
            client: Arc::new(client),
            api_key: api_key.to_string(),
            host: normalize_host(&description.host),
            dimension: description.dimension,
        })
    }

    /// Skips the control-plane lookup when the data-plane host is already known.
    pub fn with_host(host: &str, api_key: &str) -> Self {
        Self {
            client: Arc::new(Client::new()),
            api_key: api_key.to_string(),
            host: normalize_host(host),
            dimension: None,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }
}

fn normalize_host(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

fn with_auth(builder: RequestBuilder, api_key: &str) -> RequestBuilder {
    builder
        .header("Api-Key", api_key)
        .header("X-Pinecone-API-Version", API_VERSION)
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<RetrievalMatch>> {
        if let Some(expected) = self.dimension {
            if vector.len() != expected {
                return Err(anyhow!(
                    "query vector has {} dimensions but the index expects {}",
                    vector.len(),
                    expected
                ));
            }
        }

        let request = QueryRequest {
            vector,
            top_k,
            include_metadata,
            include_values: false,
        };
        let url = format!("{}/query", self.host);
        let response = with_auth(self.client.post(&url), &self.api_key)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("failed contacting index host {}", self.host))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("index query failed with {}: {}", status, body.trim()));
        }
        let parsed: QueryResponse = response
            .json()
            .await
            .context("index sent an unreadable query response")?;
        debug!(matches = parsed.matches.len(), "index query returned");

        Ok(parsed
            .matches
            .into_iter()
            .take(top_k)
            .map(|m| RetrievalMatch::from_metadata(m.id, m.score, m.metadata.as_ref()))
            .collect())
    }
}
