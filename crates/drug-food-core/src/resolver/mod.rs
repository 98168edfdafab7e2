//! Interaction resolution orchestrator.
//!
//! Pipeline: Normalization → Official reference → Generative narrative → Rule predictor
//!
//! Attempts run in order and the first one that produces text wins. Anything
//! that goes wrong, including a panic inside an injected collaborator,
//! surfaces as an `error` report carrying the raw drug name. `check` itself
//! never fails.

mod attempts;

pub use attempts::*;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use drug_food_llm::GenerativeAdapter;
use thiserror::Error;

use crate::models::{InteractionReport, SourceTag};
use crate::normalize::NameResolver;
use crate::predictor::RulePredictor;
use crate::reference::ReferenceScraper;

/// Resolution errors.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Name normalization failed: {0}")]
    Normalization(String),

    #[error("{stage} failed: {message}")]
    Attempt { stage: &'static str, message: String },

    #[error("No source produced a result")]
    Exhausted,

    #[error("Unexpected failure: {0}")]
    Panicked(String),
}

pub type ResolveResult<T> = Result<T, ResolveError>;

/// Prefix of the text returned with an `error` report.
pub const ERROR_TEXT_PREFIX: &str = "An error occurred while checking interactions";

/// Maps a free-text drug name to its canonical form.
pub trait NameNormalizer: Send + Sync {
    fn normalize(&self, raw: &str) -> ResolveResult<String>;
}

impl NameNormalizer for NameResolver {
    fn normalize(&self, raw: &str) -> ResolveResult<String> {
        Ok(self.resolve(raw))
    }
}

/// Coordinates normalization and the ordered information sources.
pub struct InteractionResolver {
    normalizer: Arc<dyn NameNormalizer>,
    attempts: Vec<Box<dyn ResolutionAttempt>>,
}

impl InteractionResolver {
    /// Create a resolver with an explicit attempt chain.
    pub fn new(
        normalizer: Arc<dyn NameNormalizer>,
        attempts: Vec<Box<dyn ResolutionAttempt>>,
    ) -> Self {
        Self {
            normalizer,
            attempts,
        }
    }

    /// The standard chain: official reference, then narrative, then rules.
    pub fn standard(
        normalizer: Arc<dyn NameNormalizer>,
        scraper: ReferenceScraper,
        adapter: GenerativeAdapter,
        predictor: RulePredictor,
    ) -> Self {
        Self::new(
            normalizer,
            vec![
                Box::new(OfficialAttempt::new(scraper)),
                Box::new(NarrativeAttempt::new(adapter)),
                Box::new(RuleAttempt::new(predictor)),
            ],
        )
    }

    /// Names of the attempts, in the order they run.
    pub fn stages(&self) -> Vec<&'static str> {
        self.attempts.iter().map(|a| a.name()).collect()
    }

    /// Resolve a drug-food pair. Never fails.
    pub fn check(&self, raw_drug: &str, raw_food: &str) -> InteractionReport {
        let span = tracing::info_span!("check_interaction", drug = %raw_drug, food = %raw_food);
        let _guard = span.enter();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.try_check(raw_drug, raw_food)))
            .unwrap_or_else(|payload| Err(ResolveError::Panicked(panic_message(&*payload))));

        match outcome {
            Ok(report) => {
                tracing::info!(
                    source = %report.source,
                    canonical = %report.canonical_drug,
                    "Interaction resolved"
                );
                report
            }
            Err(e) => {
                tracing::error!(error = %e, "Interaction check failed");
                InteractionReport::new(
                    SourceTag::Error,
                    format!("{}: {}", ERROR_TEXT_PREFIX, e),
                    raw_drug,
                )
            }
        }
    }

    fn try_check(&self, raw_drug: &str, raw_food: &str) -> ResolveResult<InteractionReport> {
        let canonical = self.normalizer.normalize(raw_drug)?;

        for attempt in &self.attempts {
            match attempt.attempt(&canonical, raw_food)? {
                Some(outcome) => {
                    return Ok(InteractionReport::new(outcome.source, outcome.text, canonical));
                }
                None => tracing::debug!(stage = attempt.name(), "No result, trying next source"),
            }
        }

        Err(ResolveError::Exhausted)
    }
}

/// Text of a panic payload, when it carries one.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
