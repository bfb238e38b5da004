//! Streaming humanization handler

use crate::api::rest::state::AppState;
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures_util::stream::{self, Stream};
use humanize_pipeline::Humanizer;
use humanize_types::{HumanizationRequest, ProgressEvent};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Sentinel data line closing every stream
pub const DONE_SENTINEL: &str = "[DONE]";

/// Run the pipeline and stream its progress via SSE
pub async fn humanize_text(
    State(state): State<AppState>,
    Json(request): Json<HumanizationRequest>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (tx, rx) = mpsc::unbounded_channel::<ProgressEvent>();
    let humanizer = state.humanizer.clone();

    info!(
        user_id = %request.user_id,
        chars = request.text.len(),
        target_style = %request.target_style,
        preserve_meaning = request.preserve_meaning,
        "Humanization requested"
    );

    spawn_pipeline(humanizer, request, tx);

    Sse::new(event_stream(rx)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

/// Run `request` on a worker task feeding `tx`.
///
/// The pipeline itself runs on a nested task. A panic there is reported as a
/// terminal `error` event. When the receiver goes away the nested task is
/// aborted, dropping any in-flight model call.
pub fn spawn_pipeline(
    humanizer: Arc<Humanizer>,
    request: HumanizationRequest,
    tx: mpsc::UnboundedSender<ProgressEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let sink = tx.clone();
        let mut pipeline = tokio::spawn(async move {
            // the outcome has already been emitted to the sink
            let _ = humanizer.humanize(request, &sink).await;
        });

        tokio::select! {
            joined = &mut pipeline => {
                if let Err(err) = joined {
                    if err.is_panic() {
                        error!("Humanization task panicked");
                        let _ = tx.send(ProgressEvent::error(
                            "internal error: humanization aborted unexpectedly",
                        ));
                    }
                }
            }
            _ = tx.closed() => {
                debug!("Client disconnected, abandoning pipeline");
                pipeline.abort();
                let _ = pipeline.await;
            }
        }
    })
}

/// Forward channel events as SSE `data:` lines, then the `[DONE]` sentinel.
fn event_stream(
    rx: mpsc::UnboundedReceiver<ProgressEvent>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    stream::unfold(Some(rx), |rx| async move {
        let mut rx = rx?;
        match rx.recv().await {
            Some(event) => {
                let json = serde_json::to_string(&event).unwrap_or_default();
                Some((Ok(Event::default().data(json)), Some(rx)))
            }
            None => Some((Ok(Event::default().data(DONE_SENTINEL)), None)),
        }
    })
}
