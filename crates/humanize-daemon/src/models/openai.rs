//! OpenAI-compatible backends.

use async_trait::async_trait;
use humanize_pipeline::models::truncate_tokens;
use humanize_pipeline::{Embedder, GenerationParams, ModelError, TextGenerator};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::http::{join_url, read_json, request_error};

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

fn authorize(request: RequestBuilder, api_key: Option<&str>) -> RequestBuilder {
    match api_key {
        Some(key) if !key.trim().is_empty() => request.bearer_auth(key),
        _ => request,
    }
}

/// Chat completion through `POST {endpoint}/chat/completions`.
pub struct OpenAiGenerator {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiGenerator {
    pub fn new(
        client: Client,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            model: model.into(),
            api_key,
        }
    }

    fn payload(&self, prompt: &str, params: &GenerationParams) -> Value {
        let mut payload = json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": truncate_tokens(prompt, params.max_input_tokens),
            }],
            "temperature": params.effective_temperature(),
            "max_tokens": params.max_output_tokens,
        });
        if let Some(top_p) = params.top_p {
            payload["top_p"] = json!(top_p);
        }
        payload
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, ModelError> {
        let url = join_url(&self.endpoint, "chat/completions");
        debug!(model = %self.model, url = %url, "Calling chat completion");

        let request = self.client.post(&url).json(&self.payload(prompt, params));
        let response = authorize(request, self.api_key.as_deref())
            .send()
            .await
            .map_err(|e| request_error("openai", e))?;

        let body: ChatResponse = read_json("openai", response).await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| ModelError::Response("openai response has no choices".into()))
    }
}

/// Embeddings through `POST {endpoint}/embeddings`.
pub struct OpenAiEmbedder {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiEmbedder {
    pub fn new(
        client: Client,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            model: model.into(),
            api_key,
        }
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    fn name(&self) -> &str {
        &self.model
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ModelError> {
        let url = join_url(&self.endpoint, "embeddings");
        let request = self
            .client
            .post(&url)
            .json(&json!({ "model": self.model, "input": text }));
        let response = authorize(request, self.api_key.as_deref())
            .send()
            .await
            .map_err(|e| request_error("openai", e))?;

        let body: EmbeddingResponse = read_json("openai", response).await?;
        body.data
            .into_iter()
            .next()
            .map(|data| data.embedding)
            .filter(|embedding| !embedding.is_empty())
            .ok_or_else(|| ModelError::Response("openai returned no embedding".into()))
    }
}
