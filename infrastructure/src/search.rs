use anyhow::anyhow;
use async_trait::async_trait;
use domain::models::RetrievalMatch;
use domain::ports::VectorIndex;
use serde_json::{Map, Value};
use shared::types::Result;

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot_product / (norm_a * norm_b)
}

struct StoredRecord {
    id: String,
    vector: Vec<f32>,
    metadata: Map<String, Value>,
}

/// Brute-force cosine index held in memory. Records are loaded up front and never change.
pub struct InMemoryIndex {
    dimension: usize,
    records: Vec<StoredRecord>,
}

impl InMemoryIndex {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            records: Vec::new(),
        }
    }

    pub fn with_record(
        mut self,
        id: impl Into<String>,
        vector: Vec<f32>,
        metadata: Map<String, Value>,
    ) -> Result<Self> {
        if vector.len() != self.dimension {
            return Err(anyhow!(
                "record has {} dimensions but the index expects {}",
                vector.len(),
                self.dimension
            ));
        }
        self.records.push(StoredRecord {
            id: id.into(),
            vector,
            metadata,
        });
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<RetrievalMatch>> {
        if vector.len() != self.dimension {
            return Err(anyhow!(
                "query vector has {} dimensions but the index expects {}",
                vector.len(),
                self.dimension
            ));
        }

        let mut scored: Vec<(f32, &StoredRecord)> = self
            .records
            .iter()
            .map(|record| (cosine_similarity(vector, &record.vector), record))
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        Ok(scored
            .into_iter()
            .take(top_k)
            .map(|(score, record)| {
                let metadata = include_metadata.then_some(&record.metadata);
                RetrievalMatch::from_metadata(record.id.clone(), score, metadata)
            })
            .collect())
    }
}
