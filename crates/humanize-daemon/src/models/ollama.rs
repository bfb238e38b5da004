//! Ollama backends.

use async_trait::async_trait;
use humanize_pipeline::models::truncate_tokens;
use humanize_pipeline::{Embedder, GenerationParams, ModelError, TextGenerator};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::http::{join_url, read_json, request_error};

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

/// Text generation through `POST {endpoint}/api/generate`.
pub struct OllamaGenerator {
    client: Client,
    endpoint: String,
    model: String,
}

impl OllamaGenerator {
    pub fn new(client: Client, endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }

    fn payload(&self, prompt: &str, params: &GenerationParams) -> Value {
        let mut options = serde_json::Map::new();
        options.insert("temperature".to_string(), json!(params.effective_temperature()));
        options.insert("num_predict".to_string(), json!(params.max_output_tokens));
        if let Some(top_p) = params.top_p {
            options.insert("top_p".to_string(), json!(top_p));
        }

        json!({
            "model": self.model,
            "prompt": truncate_tokens(prompt, params.max_input_tokens),
            "stream": false,
            "options": Value::Object(options),
        })
    }
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, ModelError> {
        let url = join_url(&self.endpoint, "api/generate");
        debug!(model = %self.model, url = %url, "Calling ollama generate");

        let response = self
            .client
            .post(&url)
            .json(&self.payload(prompt, params))
            .send()
            .await
            .map_err(|e| request_error("ollama", e))?;

        let body: GenerateResponse = read_json("ollama", response).await?;
        Ok(body.response.trim().to_string())
    }
}

/// Sentence embeddings through `POST {endpoint}/api/embeddings`.
pub struct OllamaEmbedder {
    client: Client,
    endpoint: String,
    model: String,
}

impl OllamaEmbedder {
    pub fn new(client: Client, endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    fn name(&self) -> &str {
        &self.model
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ModelError> {
        let url = join_url(&self.endpoint, "api/embeddings");
        let response = self
            .client
            .post(&url)
            .json(&json!({ "model": self.model, "prompt": text }))
            .send()
            .await
            .map_err(|e| request_error("ollama", e))?;

        let body: EmbeddingResponse = read_json("ollama", response).await?;
        if body.embedding.is_empty() {
            return Err(ModelError::Response("ollama returned an empty embedding".into()));
        }
        Ok(body.embedding)
    }
}
