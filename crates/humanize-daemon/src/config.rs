//! Configuration for humanize-daemon

use humanize_pipeline::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Main daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Model backends
    #[serde(default)]
    pub models: ModelsConfig,

    /// Pipeline tuning
    #[serde(default)]
    pub pipeline: PipelineSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    pub listen_addr: SocketAddr,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            enable_cors: true,
        }
    }
}

/// Generative backend kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorBackend {
    /// Ollama `/api/generate`
    Ollama,
    /// OpenAI-compatible `/chat/completions`
    OpenAi,
    /// Not loaded; stages needing it fail with "model not loaded"
    Disabled,
}

/// Embedding backend kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbedderBackend {
    /// Offline bag-of-words hashing
    Hashing,
    /// Ollama `/api/embeddings`
    Ollama,
    /// OpenAI-compatible `/embeddings`
    OpenAi,
}

/// Linguistic parser kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParserBackend {
    /// Built-in rule-based parser
    RuleBased,
    /// Not loaded
    Disabled,
}

/// One generative model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub backend: GeneratorBackend,

    /// Base URL of the backend
    #[serde(default = "default_ollama_endpoint")]
    pub endpoint: String,

    /// Model name sent to the backend
    pub model: String,

    /// Bearer token (OpenAI-compatible backends)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Maximum simultaneous calls to this model
    #[serde(default = "default_generator_concurrency")]
    pub max_concurrent: usize,
}

impl GeneratorConfig {
    fn ollama(model: &str) -> Self {
        Self {
            backend: GeneratorBackend::Ollama,
            endpoint: default_ollama_endpoint(),
            model: model.to_string(),
            api_key: None,
            max_concurrent: default_generator_concurrency(),
        }
    }
}

/// Embedding model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedderConfig {
    pub backend: EmbedderBackend,

    #[serde(default = "default_ollama_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_embedding_model")]
    pub model: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_embedder_concurrency")]
    pub max_concurrent: usize,

    /// Vector size of the hashing embedder
    #[serde(default = "default_dimension")]
    pub dimension: usize,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            backend: EmbedderBackend::Hashing,
            endpoint: default_ollama_endpoint(),
            model: default_embedding_model(),
            api_key: None,
            max_concurrent: default_embedder_concurrency(),
            dimension: default_dimension(),
        }
    }
}

/// Model backends configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Sentence-splitting generator
    pub structural: GeneratorConfig,

    /// Authenticity rewrite generator
    pub authenticity: GeneratorConfig,

    #[serde(default)]
    pub embedder: EmbedderConfig,

    #[serde(default = "default_parser")]
    pub parser: ParserBackend,

    /// HTTP client timeout in seconds
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            structural: GeneratorConfig::ollama("llama3.2"),
            authenticity: GeneratorConfig::ollama("llama3.2"),
            embedder: EmbedderConfig::default(),
            parser: default_parser(),
            http_timeout_secs: default_http_timeout(),
        }
    }
}

/// Pipeline tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSettings {
    /// Pause after each progress event, in milliseconds
    #[serde(default = "default_step_delay")]
    pub step_delay_ms: u64,

    /// Upper bound on a single model call, in seconds
    #[serde(default = "default_model_timeout")]
    pub model_timeout_secs: u64,

    /// Fixed seed for the voice stage
    #[serde(default)]
    pub voice_seed: Option<u64>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            step_delay_ms: default_step_delay(),
            model_timeout_secs: default_model_timeout(),
            voice_seed: None,
        }
    }
}

impl PipelineSettings {
    /// Orchestrator configuration for these settings.
    pub fn to_pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            step_delay: Duration::from_millis(self.step_delay_ms),
            model_timeout: Duration::from_secs(self.model_timeout_secs.max(1)),
            voice_seed: self.voice_seed,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers
fn default_true() -> bool {
    true
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_embedding_model() -> String {
    "nomic-embed-text".to_string()
}

fn default_generator_concurrency() -> usize {
    1
}

fn default_embedder_concurrency() -> usize {
    4
}

fn default_dimension() -> usize {
    humanize_pipeline::embedding::DEFAULT_DIMENSION
}

fn default_parser() -> ParserBackend {
    ParserBackend::RuleBased
}

fn default_http_timeout() -> u64 {
    120
}

fn default_step_delay() -> u64 {
    100
}

fn default_model_timeout() -> u64 {
    120
}

fn default_log_level() -> String {
    "info".to_string()
}

impl DaemonConfig {
    /// Load configuration: defaults, then an optional file, then
    /// `HUMANIZE__SECTION__KEY` environment variables.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        // Add default configuration
        builder = builder.add_source(config::Config::try_from(&DaemonConfig::default())?);

        // Add file configuration if provided
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        // Add environment variables with HUMANIZE prefix
        builder = builder.add_source(
            config::Environment::with_prefix("HUMANIZE")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}
