//! The four transform stages, in the order they run.

pub mod structural;
pub mod vocabulary;
pub mod authenticity;
pub mod voice;

use std::sync::Arc;

use crate::models::ModelRegistry;
use crate::traits::TransformStage;

pub use authenticity::AuthenticityStage;
pub use structural::StructuralStage;
pub use vocabulary::VocabularyStage;
pub use voice::VoiceStage;

/// The default stage list in canonical order.
pub fn default_stages(models: Arc<ModelRegistry>) -> Vec<Box<dyn TransformStage>> {
    vec![
        Box::new(StructuralStage::new(models.clone())),
        Box::new(VocabularyStage::new()),
        Box::new(AuthenticityStage::new(models)),
        Box::new(VoiceStage::new()),
    ]
}
