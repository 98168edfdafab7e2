//! Information sources tried by the orchestrator.

use drug_food_llm::{GenerativeAdapter, NO_KNOWN_INTERACTION};

use super::ResolveResult;
use crate::models::SourceTag;
use crate::predictor::RulePredictor;
use crate::reference::ReferenceScraper;

/// Text produced by one source.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptOutcome {
    pub source: SourceTag,
    pub text: String,
}

impl AttemptOutcome {
    pub fn new(source: SourceTag, text: impl Into<String>) -> Self {
        Self {
            source,
            text: text.into(),
        }
    }
}

/// One step of the resolution chain.
///
/// `Ok(None)` hands over to the next step. `Err` aborts the whole check.
pub trait ResolutionAttempt: Send + Sync {
    fn name(&self) -> &'static str;
    fn attempt(&self, drug: &str, food: &str) -> ResolveResult<Option<AttemptOutcome>>;
}

/// Authoritative reference lookup.
pub struct OfficialAttempt {
    scraper: ReferenceScraper,
}

impl OfficialAttempt {
    pub fn new(scraper: ReferenceScraper) -> Self {
        Self { scraper }
    }
}

impl ResolutionAttempt for OfficialAttempt {
    fn name(&self) -> &'static str {
        "official"
    }

    fn attempt(&self, drug: &str, food: &str) -> ResolveResult<Option<AttemptOutcome>> {
        Ok(self
            .scraper
            .fetch(drug, food)
            .filter(|text| !text.trim().is_empty())
            .map(|text| AttemptOutcome::new(SourceTag::Official, text)))
    }
}

/// Generative narrative. Declines when the model reports no known interaction
/// or cannot be reached.
pub struct NarrativeAttempt {
    adapter: GenerativeAdapter,
}

impl NarrativeAttempt {
    pub fn new(adapter: GenerativeAdapter) -> Self {
        Self { adapter }
    }
}

impl ResolutionAttempt for NarrativeAttempt {
    fn name(&self) -> &'static str {
        "narrative"
    }

    fn attempt(&self, drug: &str, food: &str) -> ResolveResult<Option<AttemptOutcome>> {
        let text = match self.adapter.narrate(drug, food) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "Narrative generation failed");
                return Ok(None);
            }
        };

        if is_no_known_interaction(&text) {
            tracing::info!(drug = %drug, "Narrative reports no known interaction");
            return Ok(None);
        }
        Ok(Some(AttemptOutcome::new(SourceTag::Ai, text)))
    }
}

/// Case-insensitive check for the "no known interaction" phrase.
pub fn is_no_known_interaction(text: &str) -> bool {
    text.to_lowercase().contains(NO_KNOWN_INTERACTION)
}

/// Static rule table. Always produces a result.
pub struct RuleAttempt {
    predictor: RulePredictor,
}

impl RuleAttempt {
    pub fn new(predictor: RulePredictor) -> Self {
        Self { predictor }
    }
}

impl ResolutionAttempt for RuleAttempt {
    fn name(&self) -> &'static str {
        "rules"
    }

    fn attempt(&self, drug: &str, food: &str) -> ResolveResult<Option<AttemptOutcome>> {
        Ok(Some(AttemptOutcome::new(
            SourceTag::Ml,
            self.predictor.predict(drug, food),
        )))
    }
}
