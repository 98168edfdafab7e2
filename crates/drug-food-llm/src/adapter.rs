//! Generative adapter used by the resolver and the reference scraper.

use std::sync::Arc;

use crate::client::{GenerationError, GenerationResult, NarrativeGenerator, UnconfiguredGenerator};
use crate::prompts::{build_full_prompt, make_narrative_prompt, make_summary_prompt};

/// Wraps a [`NarrativeGenerator`] with the two requests the system makes of it.
#[derive(Clone)]
pub struct GenerativeAdapter {
    generator: Arc<dyn NarrativeGenerator>,
}

impl Default for GenerativeAdapter {
    fn default() -> Self {
        Self::unavailable()
    }
}

impl GenerativeAdapter {
    pub fn new(generator: Arc<dyn NarrativeGenerator>) -> Self {
        Self { generator }
    }

    /// An adapter whose every request fails with `NotConfigured`.
    pub fn unavailable() -> Self {
        Self::new(Arc::new(UnconfiguredGenerator))
    }

    /// Free-text interaction narrative for a drug/food pair.
    pub fn narrate(&self, drug: &str, food: &str) -> GenerationResult<String> {
        let prompt = build_full_prompt(&make_narrative_prompt(drug, food));
        let text = self.generator.generate(&prompt)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text.to_string())
    }

    /// One or two plain-language sentences summarizing official reference text.
    pub fn summarize(
        &self,
        official_text: &str,
        drug: &str,
        food: &str,
    ) -> GenerationResult<String> {
        let prompt = make_summary_prompt(official_text, drug, food);
        let text = self.generator.generate(&prompt)?;
        let cleaned = clean_summary(&text);
        if cleaned.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(cleaned)
    }
}

/// Trim whitespace and one layer of surrounding quote characters.
pub fn clean_summary(text: &str) -> String {
    let trimmed = text.trim();
    let trimmed = trimmed
        .strip_prefix(['"', '\''])
        .unwrap_or(trimmed);
    let trimmed = trimmed
        .strip_suffix(['"', '\''])
        .unwrap_or(trimmed);
    trimmed.trim().to_string()
}
