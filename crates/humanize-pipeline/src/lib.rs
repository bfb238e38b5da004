//! Humanize Pipeline - staged rewriting of machine-generated text
//!
//! A request flows through a fixed sequence of stages, each consuming the
//! previous stage's text, and ends at a semantic-similarity gate that keeps
//! or reverts the cumulative rewrite.
//!
//! ## Pipeline
//!
//! 0. **Analyzing** - derive a [`StyleProfile`] (skipped when one is supplied)
//! 1. **Structural** - split sentences longer than the profile's length band
//! 2. **Vocabulary** - replace AI-flavored terms with plainer ones
//! 3. **Authenticity** - generative rewrite adding natural variation
//! 4. **Voice** - interleave the writer's recurring phrases
//! 5. **Coherence** - accept the rewrite only above a similarity threshold
//!
//! Model access goes through the [`TextGenerator`], [`Embedder`] and
//! [`LinguisticParser`] traits held by a shared [`ModelRegistry`].
//!
//! [`StyleProfile`]: humanize_types::StyleProfile

#![deny(unsafe_code)]

pub mod analyzer;
pub mod coherence;
pub mod context;
pub mod embedding;
pub mod error;
pub mod humanizer;
pub mod mocks;
pub mod models;
pub mod nlp;
pub mod stages;
pub mod traits;

pub use analyzer::{profile_from_doc, StyleAnalyzer};
pub use coherence::{CoherenceGate, CoherenceVerdict, COHERENCE_THRESHOLD};
pub use context::{PipelineContext, StageOutcome};
pub use embedding::{cosine_similarity, HashingEmbedder};
pub use error::{HumanizeError, ModelError};
pub use humanizer::{HumanizationOutcome, Humanizer, PipelineConfig, TRANSFORM_ORDER};
pub use mocks::{MockEmbedder, RecordingSink, ScriptedGenerator};
pub use models::{
    ConcurrencyLimited, Embedder, GenerationParams, LinguisticParser, ModelRegistry,
    ModelRegistryBuilder, TextGenerator,
};
pub use nlp::{ParsedDoc, ParsedSentence, PosTag, RuleParser, Token};
pub use stages::{AuthenticityStage, StructuralStage, VocabularyStage, VoiceStage};
pub use traits::{NullSink, ProgressSink, TransformStage};
