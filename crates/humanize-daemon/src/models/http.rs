//! Shared HTTP plumbing for model backends.

use std::time::Duration;

use humanize_pipeline::ModelError;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

/// Build the client used by every HTTP backend.
///
/// System proxies are bypassed unless `HUMANIZE_USE_SYSTEM_PROXY` is set.
pub fn build_http_client(timeout: Duration) -> Result<Client, String> {
    let mut builder = Client::builder().timeout(timeout);
    let allow_system_proxy = std::env::var("HUMANIZE_USE_SYSTEM_PROXY")
        .map(|value| matches!(value.as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);

    if !allow_system_proxy {
        builder = builder.no_proxy();
    }

    builder
        .build()
        .map_err(|e| format!("failed to build HTTP client: {}", e))
}

/// `{endpoint}/{path}` without doubled slashes.
pub fn join_url(endpoint: &str, path: &str) -> String {
    format!(
        "{}/{}",
        endpoint.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Decode a JSON body, turning non-2xx statuses into [`ModelError::Response`].
pub async fn read_json<T: DeserializeOwned>(
    backend: &str,
    response: Response,
) -> Result<T, ModelError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(ModelError::Response(format!(
            "{} error {}: {}",
            backend,
            status,
            truncate(&body, 320)
        )));
    }

    response
        .json()
        .await
        .map_err(|e| ModelError::Response(format!("invalid {} response: {}", backend, e)))
}

/// Map a transport failure.
pub fn request_error(backend: &str, err: reqwest::Error) -> ModelError {
    if err.is_timeout() {
        ModelError::Request(format!("{} request timed out: {}", backend, err))
    } else {
        ModelError::Request(format!("{} request failed: {}", backend, err))
    }
}

pub fn truncate(input: &str, max_chars: usize) -> String {
    if input.chars().count() <= max_chars {
        return input.to_string();
    }
    let mut out: String = input.chars().take(max_chars).collect();
    out.push_str("...");
    out
}
