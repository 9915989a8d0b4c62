//! Test doubles shared by the workspace integration tests.

use anyhow::anyhow;
use async_trait::async_trait;
use domain::message::Message;
use domain::ports::{Embedder, LanguageModel};
use serde_json::{Map, Value};
use shared::types::Result;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Maps known questions to fixed vectors; unknown text is an error.
pub struct LookupEmbedder {
    vectors: HashMap<String, Vec<f32>>,
}

impl LookupEmbedder {
    pub fn new(pairs: &[(&str, Vec<f32>)]) -> Self {
        Self {
            vectors: pairs
                .iter()
                .map(|(text, v)| (text.to_string(), v.clone()))
                .collect(),
        }
    }
}

#[async_trait]
impl Embedder for LookupEmbedder {
    async fn encode(&self, text: &str) -> Result<Vec<f32>> {
        self.vectors
            .get(text)
            .cloned()
            .ok_or_else(|| anyhow!("no vector for {text:?}"))
    }
}

/// Replies with a fixed answer and keeps every conversation it was sent.
#[derive(Clone)]
pub struct ScriptedModel {
    reply: String,
    pub prompts: Arc<Mutex<Vec<Vec<Message>>>>,
}

impl ScriptedModel {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn last_user_prompt(&self) -> Option<String> {
        let prompts = self.prompts.lock().ok()?;
        prompts
            .last()
            .and_then(|messages| messages.iter().rev().find(|m| m.role == "user"))
            .map(|m| m.content.clone())
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, messages: &[Message], _temperature: f32) -> Result<String> {
        self.prompts
            .lock()
            .map_err(|_| anyhow!("prompt log poisoned"))?
            .push(messages.to_vec());
        Ok(self.reply.clone())
    }
}

pub fn metadata(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
