pub mod gemini;

pub use gemini::GeminiTranslator;

use crate::error::Result;
use crate::pairs::TranslationPair;
use async_trait::async_trait;

#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate a joined batch text as a single unit.
    async fn translate_joined(&self, text: &str) -> Result<String>;

    /// Translate each fragment separately, returning (origin, target) pairs
    /// in input order. Failures fail the whole call; no partial lists.
    async fn translate_list(&self, texts: &[String]) -> Result<Vec<TranslationPair>>;

    fn name(&self) -> &'static str;
}
