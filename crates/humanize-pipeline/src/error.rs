use std::time::Duration;

use humanize_types::PipelineStep;
use thiserror::Error;

/// Errors raised by model collaborators (generators, embedders, parsers).
#[derive(Error, Debug, Clone)]
pub enum ModelError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("invalid response: {0}")]
    Response(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("model unavailable: {0}")]
    Unavailable(String),
}

/// Errors from the humanization pipeline.
///
/// `EmptyResult` is recovered inside the stage that detects it and never
/// aborts a request; every other variant aborts the whole pipeline.
#[derive(Error, Debug)]
pub enum HumanizeError {
    #[error("model not loaded: {0}")]
    ModelUnavailable(String),

    #[error("generation failed during {step} stage: {source}")]
    GenerationFailure {
        step: PipelineStep,
        #[source]
        source: ModelError,
    },

    #[error("linguistic analysis failed: {0}")]
    AnalysisFailure(String),

    #[error("{0} stage produced no usable result")]
    EmptyResult(PipelineStep),

    #[error("invalid pipeline: {0}")]
    InvalidPipeline(String),
}

impl HumanizeError {
    pub(crate) fn generation(step: PipelineStep, source: ModelError) -> Self {
        HumanizeError::GenerationFailure { step, source }
    }

    pub(crate) fn analysis(source: ModelError) -> Self {
        HumanizeError::AnalysisFailure(source.to_string())
    }
}
