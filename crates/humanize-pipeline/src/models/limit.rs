use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use super::{Embedder, GenerationParams, TextGenerator};
use crate::error::ModelError;

/// Bounds the number of in-flight calls to a shared model.
///
/// Runtimes that cannot serve concurrent inference are wrapped with a single
/// permit; requests then queue per model instead of corrupting shared state.
pub struct ConcurrencyLimited<T: ?Sized> {
    inner: Arc<T>,
    permits: Arc<Semaphore>,
    name: String,
}

impl<T: ?Sized> ConcurrencyLimited<T> {
    fn with_permits(inner: Arc<T>, name: &str, max_concurrent: usize) -> Self {
        Self {
            inner,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            name: name.to_string(),
        }
    }
}

impl ConcurrencyLimited<dyn TextGenerator> {
    /// Wrap a generator with at most `max_concurrent` simultaneous calls.
    pub fn generator(
        inner: Arc<dyn TextGenerator>,
        max_concurrent: usize,
    ) -> Arc<dyn TextGenerator> {
        let name = inner.name().to_string();
        Arc::new(Self::with_permits(inner, &name, max_concurrent))
    }
}

impl ConcurrencyLimited<dyn Embedder> {
    /// Wrap an embedder with at most `max_concurrent` simultaneous calls.
    pub fn embedder(inner: Arc<dyn Embedder>, max_concurrent: usize) -> Arc<dyn Embedder> {
        let name = inner.name().to_string();
        Arc::new(Self::with_permits(inner, &name, max_concurrent))
    }
}

#[async_trait]
impl TextGenerator for ConcurrencyLimited<dyn TextGenerator> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, ModelError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| ModelError::Unavailable(format!("{} is shutting down", self.name)))?;
        self.inner.generate(prompt, params).await
    }
}

#[async_trait]
impl Embedder for ConcurrencyLimited<dyn Embedder> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ModelError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| ModelError::Unavailable(format!("{} is shutting down", self.name)))?;
        self.inner.embed(text).await
    }
}
