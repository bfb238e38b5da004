use async_trait::async_trait;
use humanize_types::{PipelineStep, ProgressEvent};
use tokio::sync::mpsc;

use crate::context::{PipelineContext, StageOutcome};
use crate::error::HumanizeError;

/// A transform stage of the humanization pipeline.
///
/// Each stage reads `context.current` and writes its rewrite back. Recoverable
/// conditions are reported as [`StageOutcome::FellBack`]; any `Err` aborts the
/// request.
#[async_trait]
pub trait TransformStage: Send + Sync {
    /// Step this stage implements.
    fn step(&self) -> PipelineStep;

    /// Transform the current text in place.
    async fn apply(&self, context: &mut PipelineContext) -> Result<StageOutcome, HumanizeError>;
}

/// Receiver of progress events.
pub trait ProgressSink: Send + Sync {
    /// Deliver one event. Returns `false` once the receiver is gone.
    fn emit(&self, event: ProgressEvent) -> bool;
}

impl ProgressSink for mpsc::UnboundedSender<ProgressEvent> {
    fn emit(&self, event: ProgressEvent) -> bool {
        self.send(event).is_ok()
    }
}

/// Sink that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&self, _event: ProgressEvent) -> bool {
        true
    }
}
