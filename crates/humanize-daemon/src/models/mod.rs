//! Model backends and registry wiring.

pub mod http;
pub mod ollama;
pub mod openai;

use std::sync::Arc;
use std::time::Duration;

use humanize_pipeline::{
    ConcurrencyLimited, Embedder, HashingEmbedder, ModelRegistry, RuleParser, TextGenerator,
};
use reqwest::Client;
use tracing::info;

use crate::config::{
    EmbedderBackend, EmbedderConfig, GeneratorBackend, GeneratorConfig, ModelsConfig,
    ParserBackend,
};
use crate::error::{DaemonError, DaemonResult};

pub use ollama::{OllamaEmbedder, OllamaGenerator};
pub use openai::{OpenAiEmbedder, OpenAiGenerator};

/// Build the process-wide registry from configuration.
///
/// Disabled generators are left out; requests needing them fail with
/// "model not loaded".
pub fn build_registry(config: &ModelsConfig) -> DaemonResult<ModelRegistry> {
    let client = http::build_http_client(Duration::from_secs(config.http_timeout_secs.max(1)))
        .map_err(DaemonError::Models)?;

    let mut builder = ModelRegistry::builder();

    if let Some(generator) = build_generator(&client, &config.structural)? {
        builder = builder.structural_generator(generator);
    }
    if let Some(generator) = build_generator(&client, &config.authenticity)? {
        builder = builder.authenticity_generator(generator);
    }
    builder = builder.embedder(build_embedder(&client, &config.embedder)?);
    if config.parser == ParserBackend::RuleBased {
        builder = builder.parser(Arc::new(RuleParser::new()));
    }

    let registry = builder.build();
    for (role, name) in registry.loaded() {
        info!(role, model = %name, "Model loaded");
    }
    Ok(registry)
}

fn build_generator(
    client: &Client,
    config: &GeneratorConfig,
) -> DaemonResult<Option<Arc<dyn TextGenerator>>> {
    let generator: Arc<dyn TextGenerator> = match config.backend {
        GeneratorBackend::Disabled => return Ok(None),
        GeneratorBackend::Ollama => Arc::new(OllamaGenerator::new(
            client.clone(),
            &config.endpoint,
            &config.model,
        )),
        GeneratorBackend::OpenAi => Arc::new(OpenAiGenerator::new(
            client.clone(),
            &config.endpoint,
            &config.model,
            config.api_key.clone(),
        )),
    };
    if config.model.trim().is_empty() {
        return Err(DaemonError::Models(format!(
            "{:?} generator requires a model name",
            config.backend
        )));
    }
    Ok(Some(ConcurrencyLimited::generator(
        generator,
        config.max_concurrent,
    )))
}

fn build_embedder(client: &Client, config: &EmbedderConfig) -> DaemonResult<Arc<dyn Embedder>> {
    let embedder: Arc<dyn Embedder> = match config.backend {
        EmbedderBackend::Hashing => {
            if config.dimension == 0 {
                return Err(DaemonError::Models(
                    "hashing embedder dimension must be positive".into(),
                ));
            }
            return Ok(Arc::new(HashingEmbedder::new(config.dimension)));
        }
        EmbedderBackend::Ollama => Arc::new(OllamaEmbedder::new(
            client.clone(),
            &config.endpoint,
            &config.model,
        )),
        EmbedderBackend::OpenAi => Arc::new(OpenAiEmbedder::new(
            client.clone(),
            &config.endpoint,
            &config.model,
            config.api_key.clone(),
        )),
    };
    Ok(ConcurrencyLimited::embedder(embedder, config.max_concurrent))
}
