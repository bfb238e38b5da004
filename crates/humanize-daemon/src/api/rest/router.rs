//! API Router configuration

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the main API router
pub fn create_router(state: AppState, enable_cors: bool) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/analyze-patterns", post(handlers::analyze_patterns))
        .route("/humanize-text", post(handlers::humanize_text))
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    router.with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use humanize_pipeline::{
        mocks, HashingEmbedder, Humanizer, ModelError, ModelRegistry, PipelineConfig,
        ScriptedGenerator,
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app_with(models: ModelRegistry) -> Router {
        let models = Arc::new(models);
        let humanizer = Arc::new(Humanizer::new(
            models.clone(),
            PipelineConfig {
                voice_seed: Some(3),
                ..PipelineConfig::default()
            },
        ));
        create_router(AppState::new(humanizer, models), true)
    }

    fn app() -> Router {
        app_with(mocks::registry_with(
            ScriptedGenerator::echo(),
            ScriptedGenerator::passthrough(),
        ))
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_string(resp: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    /// JSON payloads of the `data:` lines of an SSE body.
    fn data_lines(body: &str) -> Vec<&str> {
        body.lines()
            .filter_map(|line| line.strip_prefix("data: "))
            .collect()
    }

    #[tokio::test]
    async fn health_reports_loaded_models() {
        let resp = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["models_loaded"], 4);
    }

    #[tokio::test]
    async fn analyze_patterns_returns_profile() {
        let resp = app()
            .oneshot(post_json(
                "/analyze-patterns",
                serde_json::json!({"text": "The cat sat on the mat. It slept."}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        let patterns = &json["patterns"];
        assert_eq!(patterns["sentence_length_sample"], serde_json::json!([6, 2]));
        assert_eq!(patterns["avg_sentence_length"], 4.0);
    }

    #[tokio::test]
    async fn analyze_patterns_fault_is_500_with_detail() {
        let models = ModelRegistry::builder()
            .embedder(Arc::new(HashingEmbedder::default()))
            .build();
        let resp = app_with(models)
            .oneshot(post_json(
                "/analyze-patterns",
                serde_json::json!({"text": "Anything."}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert!(json["detail"].as_str().unwrap().contains("parser"));
    }

    #[tokio::test]
    async fn humanize_text_streams_progress_then_done() {
        let resp = app()
            .oneshot(post_json(
                "/humanize-text",
                serde_json::json!({
                    "text": "We utilize the shared cluster for builds every single day.",
                    "user_id": "u-1"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/event-stream"));

        let body = body_string(resp).await;
        let lines = data_lines(&body);
        assert_eq!(lines.last(), Some(&"[DONE]"));

        let events: Vec<serde_json::Value> = lines[..lines.len() - 1]
            .iter()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        let steps: Vec<&str> = events
            .iter()
            .filter(|event| event["type"] == "progress")
            .map(|event| event["step"].as_str().unwrap())
            .collect();
        assert_eq!(
            steps,
            vec!["analyzing", "structural", "vocabulary", "authenticity", "voice", "coherence"]
        );

        let complete = events.last().unwrap();
        assert_eq!(complete["type"], "complete");
        assert_eq!(
            complete["text"],
            "We use the shared cluster for builds every single day."
        );
        assert!(complete["user_patterns"].is_object());
    }

    #[tokio::test]
    async fn humanize_text_error_still_ends_with_done() {
        let app = app_with(mocks::registry_with(
            ScriptedGenerator::echo(),
            ScriptedGenerator::failing("backend offline"),
        ));
        let resp = app
            .oneshot(post_json(
                "/humanize-text",
                serde_json::json!({"text": "Short text."}),
            ))
            .await
            .unwrap();

        let body = body_string(resp).await;
        let lines = data_lines(&body);
        assert_eq!(lines.last(), Some(&"[DONE]"));

        let error: serde_json::Value = serde_json::from_str(lines[lines.len() - 2]).unwrap();
        assert_eq!(error["type"], "error");
        assert!(error["message"].as_str().unwrap().contains("backend offline"));
        assert!(!body.contains("\"complete\""));
    }

    #[tokio::test]
    async fn humanize_text_panic_becomes_error_event() {
        let app = app_with(mocks::registry_with(
            ScriptedGenerator::echo(),
            ScriptedGenerator::from_fn(|_: &str| -> Result<String, ModelError> {
                panic!("runtime crashed")
            }),
        ));
        let resp = app
            .oneshot(post_json(
                "/humanize-text",
                serde_json::json!({"text": "Short text."}),
            ))
            .await
            .unwrap();

        let body = body_string(resp).await;
        let lines = data_lines(&body);
        assert_eq!(lines.last(), Some(&"[DONE]"));

        let error: serde_json::Value = serde_json::from_str(lines[lines.len() - 2]).unwrap();
        assert_eq!(error["type"], "error");
        assert!(!body.contains("\"complete\""));
    }

    #[tokio::test]
    async fn non_ascii_text_is_analyzed() {
        let resp = app()
            .oneshot(post_json(
                "/analyze-patterns",
                serde_json::json!({"text": "I am 丸ing today."}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn supplied_profile_skips_analyzing() {
        let resp = app()
            .oneshot(post_json(
                "/humanize-text",
                serde_json::json!({
                    "text": "Plain words here.",
                    "user_patterns": {"avg_sentence_length": 12.0, "sentence_length_std": 3.0}
                }),
            ))
            .await
            .unwrap();

        let body = body_string(resp).await;
        assert!(!body.contains("\"analyzing\""));
        assert!(body.contains("\"structural\""));
    }

    #[tokio::test]
    async fn missing_text_is_rejected() {
        let resp = app()
            .oneshot(post_json("/humanize-text", serde_json::json!({"user_id": "x"})))
            .await
            .unwrap();
        assert!(resp.status().is_client_error());
    }
}
