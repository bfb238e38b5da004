//! Test doubles for the model collaborators and progress delivery.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use humanize_types::{PipelineStep, ProgressEvent};

use crate::embedding::HashingEmbedder;
use crate::error::ModelError;
use crate::models::{Embedder, GenerationParams, ModelRegistry, TextGenerator};
use crate::nlp::RuleParser;
use crate::traits::ProgressSink;

type GenerateFn = dyn Fn(&str) -> Result<String, ModelError> + Send + Sync;

#[derive(Clone)]
enum Script {
    Fixed(String),
    Echo,
    Passthrough,
    Failing(String),
    Custom(Arc<GenerateFn>),
}

/// Mock text generator with a scripted response.
///
/// Clones share the call log.
#[derive(Clone)]
pub struct ScriptedGenerator {
    script: Script,
    delay: Option<Duration>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedGenerator {
    fn with_script(script: Script) -> Self {
        Self {
            script,
            delay: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always return `response`.
    pub fn fixed(response: impl Into<String>) -> Self {
        Self::with_script(Script::Fixed(response.into()))
    }

    /// Return the prompt verbatim.
    pub fn echo() -> Self {
        Self::with_script(Script::Echo)
    }

    /// Return the prompt payload after the instruction prefix (`"...: "`).
    pub fn passthrough() -> Self {
        Self::with_script(Script::Passthrough)
    }

    /// Fail every call with [`ModelError::Request`].
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_script(Script::Failing(message.into()))
    }

    /// Compute the response from the prompt.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&str) -> Result<String, ModelError> + Send + Sync + 'static,
    {
        Self::with_script(Script::Custom(Arc::new(f)))
    }

    /// Sleep for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }

    /// Prompts received so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(
        &self,
        prompt: &str,
        _params: &GenerationParams,
    ) -> Result<String, ModelError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(prompt.to_string());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.script {
            Script::Fixed(response) => Ok(response.clone()),
            Script::Echo => Ok(prompt.to_string()),
            Script::Passthrough => Ok(prompt
                .split_once(": ")
                .map(|(_, payload)| payload)
                .unwrap_or(prompt)
                .to_string()),
            Script::Failing(message) => Err(ModelError::Request(message.clone())),
            Script::Custom(f) => f(prompt),
        }
    }
}

/// Mock embedder returning a fixed vector or failing.
#[derive(Clone)]
pub struct MockEmbedder {
    response: Result<Vec<f32>, String>,
    calls: Arc<AtomicUsize>,
}

impl MockEmbedder {
    /// Embed every text to `vector`.
    pub fn constant(vector: Vec<f32>) -> Self {
        Self {
            response: Ok(vector),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Fail every call.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            response: Err(message.into()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    fn name(&self) -> &str {
        "mock-embedder"
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f32>, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone().map_err(ModelError::Request)
    }
}

/// Progress sink that keeps every event in memory.
#[derive(Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    /// Steps of the recorded progress events, in order.
    pub fn steps(&self) -> Vec<PipelineStep> {
        self.events().iter().filter_map(ProgressEvent::step).collect()
    }
}

impl ProgressSink for RecordingSink {
    fn emit(&self, event: ProgressEvent) -> bool {
        match self.events.lock() {
            Ok(mut events) => {
                events.push(event);
                true
            }
            Err(_) => false,
        }
    }
}

/// Registry with the given generators, the rule-based parser and the
/// hashing embedder.
pub fn registry_with(structural: ScriptedGenerator, authenticity: ScriptedGenerator) -> ModelRegistry {
    ModelRegistry::builder()
        .structural_generator(Arc::new(structural))
        .authenticity_generator(Arc::new(authenticity))
        .embedder(Arc::new(HashingEmbedder::default()))
        .parser(Arc::new(RuleParser::new()))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_generator_records_calls() {
        let generator = ScriptedGenerator::passthrough();
        let shared = generator.clone();
        let params = GenerationParams::sentence_split();

        let out = generator.generate("Do this: keep me", &params).await.unwrap();
        assert_eq!(out, "keep me");
        assert_eq!(shared.call_count(), 1);
        assert_eq!(shared.calls(), vec!["Do this: keep me".to_string()]);
    }

    #[tokio::test]
    async fn custom_script() {
        let generator = ScriptedGenerator::from_fn(|prompt| Ok(prompt.to_uppercase()));
        let params = GenerationParams::sentence_split();
        assert_eq!(generator.generate("abc", &params).await.unwrap(), "ABC");
    }

    #[test]
    fn recording_sink_keeps_steps() {
        let sink = RecordingSink::new();
        sink.emit(ProgressEvent::progress(PipelineStep::Structural));
        sink.emit(ProgressEvent::error("boom"));
        assert_eq!(sink.events().len(), 2);
        assert_eq!(sink.steps(), vec![PipelineStep::Structural]);
    }
}
