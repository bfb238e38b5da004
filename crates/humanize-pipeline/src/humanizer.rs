use std::sync::Arc;
use std::time::Duration;

use humanize_types::{HumanizationRequest, PipelineStep, ProgressEvent, StyleProfile};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::analyzer::StyleAnalyzer;
use crate::coherence::CoherenceGate;
use crate::context::{PipelineContext, StageOutcome};
use crate::error::HumanizeError;
use crate::models::ModelRegistry;
use crate::stages::default_stages;
use crate::traits::{ProgressSink, TransformStage};

/// Transform steps in the order the orchestrator runs them.
pub const TRANSFORM_ORDER: [PipelineStep; 4] = [
    PipelineStep::Structural,
    PipelineStep::Vocabulary,
    PipelineStep::Authenticity,
    PipelineStep::Voice,
];

/// Configuration for the orchestrator.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Pause after each progress event (default: none)
    pub step_delay: Duration,
    /// Upper bound on any single model call (default: 120s)
    pub model_timeout: Duration,
    /// Fixed seed for the voice stage; entropy when unset
    pub voice_seed: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            step_delay: Duration::ZERO,
            model_timeout: Duration::from_secs(120),
            voice_seed: None,
        }
    }
}

/// Result of one successful humanization run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HumanizationOutcome {
    /// Final text (the original when the gate reverted)
    pub text: String,
    /// Similarity between original and rewrite
    pub similarity_score: f64,
    /// Profile the stages targeted
    pub profile: StyleProfile,
    /// Whether the coherence gate discarded the rewrite
    pub reverted: bool,
    /// Outcome of each transform stage, in run order
    #[serde(skip)]
    pub stages: Vec<(PipelineStep, StageOutcome)>,
}

impl HumanizationOutcome {
    /// Terminal `complete` event for this outcome.
    pub fn to_event(&self) -> ProgressEvent {
        ProgressEvent::Complete {
            text: self.text.clone(),
            similarity_score: self.similarity_score,
            user_patterns: self.profile.clone(),
        }
    }
}

/// The humanization pipeline.
///
/// Built once at startup around the shared [`ModelRegistry`] and used by every
/// request; holds no per-request state. Each call runs
/// `analyzing? → structural → vocabulary → authenticity → voice → coherence`
/// exactly once, emitting a progress event before each step.
pub struct Humanizer {
    stages: Vec<Box<dyn TransformStage>>,
    analyzer: StyleAnalyzer,
    gate: CoherenceGate,
    config: PipelineConfig,
}

impl Humanizer {
    /// Create a humanizer with the default stages.
    pub fn new(models: Arc<ModelRegistry>, config: PipelineConfig) -> Self {
        Self {
            stages: default_stages(models.clone()),
            analyzer: StyleAnalyzer::new(models.clone()),
            gate: CoherenceGate::new(models),
            config,
        }
    }

    /// Create a humanizer with custom stages.
    ///
    /// Fails with [`HumanizeError::InvalidPipeline`] unless the stages cover
    /// every transform step exactly once, in canonical order.
    pub fn with_stages(
        models: Arc<ModelRegistry>,
        config: PipelineConfig,
        stages: Vec<Box<dyn TransformStage>>,
    ) -> Result<Self, HumanizeError> {
        let steps: Vec<PipelineStep> = stages.iter().map(|stage| stage.step()).collect();
        if steps != TRANSFORM_ORDER {
            return Err(HumanizeError::InvalidPipeline(format!(
                "expected stages {:?}, got {:?}",
                TRANSFORM_ORDER, steps
            )));
        }
        Ok(Self {
            stages,
            analyzer: StyleAnalyzer::new(models.clone()),
            gate: CoherenceGate::new(models),
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Derive a style profile from `text`.
    pub async fn analyze_patterns(&self, text: &str) -> Result<StyleProfile, HumanizeError> {
        self.analyzer
            .analyze(text, Some(self.config.model_timeout))
            .await
    }

    /// Run the full pipeline for `request`.
    ///
    /// Emits `complete` on success or `error` on failure as the last event;
    /// the error is also returned.
    pub async fn humanize(
        &self,
        request: HumanizationRequest,
        sink: &dyn ProgressSink,
    ) -> Result<HumanizationOutcome, HumanizeError> {
        match self.run(request, sink).await {
            Ok(outcome) => {
                info!(
                    similarity = outcome.similarity_score,
                    reverted = outcome.reverted,
                    "Humanization complete"
                );
                sink.emit(outcome.to_event());
                Ok(outcome)
            }
            Err(err) => {
                error!(error = %err, "Humanization failed");
                sink.emit(ProgressEvent::error(err.to_string()));
                Err(err)
            }
        }
    }

    async fn run(
        &self,
        request: HumanizationRequest,
        sink: &dyn ProgressSink,
    ) -> Result<HumanizationOutcome, HumanizeError> {
        let timeout = self.config.model_timeout;

        let profile = match request.user_patterns {
            Some(profile) => profile,
            None => {
                self.enter(PipelineStep::Analyzing, sink).await;
                self.analyzer.analyze(&request.text, Some(timeout)).await?
            }
        };

        let rng = match self.config.voice_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut context = PipelineContext::new(request.text, profile, rng, timeout);

        for stage in &self.stages {
            let step = stage.step();
            self.enter(step, sink).await;
            let outcome = stage.apply(&mut context).await?;
            debug!(step = %step, outcome = ?outcome, "Stage finished");
            context.record_stage(step, outcome);
        }

        let fallbacks = context.fallbacks();
        if !fallbacks.is_empty() {
            warn!(steps = ?fallbacks, "Stages kept their input");
        }

        self.enter(PipelineStep::Coherence, sink).await;
        let verdict = self
            .gate
            .check(&context.original, &context.current, timeout)
            .await?;

        Ok(HumanizationOutcome {
            text: verdict.text,
            similarity_score: verdict.similarity,
            profile: context.profile,
            reverted: verdict.reverted,
            stages: context.stage_results,
        })
    }

    /// Announce `step`, then pause for the configured delay.
    async fn enter(&self, step: PipelineStep, sink: &dyn ProgressSink) {
        info!(step = %step, "Starting stage");
        if !sink.emit(ProgressEvent::progress(step)) {
            debug!(step = %step, "Progress receiver gone");
        }
        if !self.config.step_delay.is_zero() {
            tokio::time::sleep(self.config.step_delay).await;
        }
    }
}
