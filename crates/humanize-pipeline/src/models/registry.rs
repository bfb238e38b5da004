use std::sync::Arc;

use super::{Embedder, LinguisticParser, TextGenerator};
use crate::error::HumanizeError;

/// Process-wide holder of the loaded model resources.
///
/// Built once at startup and shared read-only by every request. A missing
/// resource surfaces as [`HumanizeError::ModelUnavailable`] when a stage asks
/// for it.
#[derive(Clone, Default)]
pub struct ModelRegistry {
    structural: Option<Arc<dyn TextGenerator>>,
    authenticity: Option<Arc<dyn TextGenerator>>,
    embedder: Option<Arc<dyn Embedder>>,
    parser: Option<Arc<dyn LinguisticParser>>,
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("structural", &self.structural.as_ref().map(|m| m.name()))
            .field("authenticity", &self.authenticity.as_ref().map(|m| m.name()))
            .field("embedder", &self.embedder.as_ref().map(|m| m.name()))
            .field("parser", &self.parser.as_ref().map(|m| m.name()))
            .finish()
    }
}

impl ModelRegistry {
    pub fn builder() -> ModelRegistryBuilder {
        ModelRegistryBuilder::default()
    }

    /// Generator used to split overlong sentences.
    pub fn structural_generator(&self) -> Result<&Arc<dyn TextGenerator>, HumanizeError> {
        self.structural
            .as_ref()
            .ok_or_else(|| HumanizeError::ModelUnavailable("structural generator".into()))
    }

    /// Generator used for the authenticity rewrite.
    pub fn authenticity_generator(&self) -> Result<&Arc<dyn TextGenerator>, HumanizeError> {
        self.authenticity
            .as_ref()
            .ok_or_else(|| HumanizeError::ModelUnavailable("authenticity generator".into()))
    }

    /// Semantic similarity embedder.
    pub fn embedder(&self) -> Result<&Arc<dyn Embedder>, HumanizeError> {
        self.embedder
            .as_ref()
            .ok_or_else(|| HumanizeError::ModelUnavailable("embedder".into()))
    }

    /// Linguistic parser.
    pub fn parser(&self) -> Result<&Arc<dyn LinguisticParser>, HumanizeError> {
        self.parser
            .as_ref()
            .ok_or_else(|| HumanizeError::ModelUnavailable("parser".into()))
    }

    /// Number of loaded resources.
    pub fn loaded_count(&self) -> usize {
        self.loaded().len()
    }

    /// `(role, model name)` of every loaded resource.
    pub fn loaded(&self) -> Vec<(&'static str, String)> {
        let mut loaded = Vec::new();
        if let Some(model) = &self.structural {
            loaded.push(("structural", model.name().to_string()));
        }
        if let Some(model) = &self.authenticity {
            loaded.push(("authenticity", model.name().to_string()));
        }
        if let Some(model) = &self.embedder {
            loaded.push(("embedder", model.name().to_string()));
        }
        if let Some(model) = &self.parser {
            loaded.push(("parser", model.name().to_string()));
        }
        loaded
    }
}

/// Builder for [`ModelRegistry`].
#[derive(Default)]
pub struct ModelRegistryBuilder {
    registry: ModelRegistry,
}

impl ModelRegistryBuilder {
    pub fn structural_generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.registry.structural = Some(generator);
        self
    }

    pub fn authenticity_generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.registry.authenticity = Some(generator);
        self
    }

    pub fn embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.registry.embedder = Some(embedder);
        self
    }

    pub fn parser(mut self, parser: Arc<dyn LinguisticParser>) -> Self {
        self.registry.parser = Some(parser);
        self
    }

    pub fn build(self) -> ModelRegistry {
        self.registry
    }
}
