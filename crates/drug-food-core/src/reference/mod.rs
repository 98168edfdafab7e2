//! Authoritative reference scraper.
//!
//! Pipeline: lookup key → URL table → fetch → section extraction →
//! classification → summary → rendered verdict.
//!
//! Each external call is fail-soft. A missing URL, a failed fetch or a
//! document without food content all yield `None`.

mod classify;
mod extract;
mod fetch;
mod key;

pub use classify::*;
pub use extract::*;
pub use fetch::*;
pub use key::*;

use std::sync::Arc;

use drug_food_llm::GenerativeAdapter;

use crate::models::{InteractionVerdict, SourceTag};
use crate::tables::ReferenceUrlTable;

/// Character budget for the explanation when no summary can be generated.
pub const FALLBACK_REASON_CHARS: usize = 100;

/// Provenance footer for reference verdicts.
pub const OFFICIAL_PROVENANCE: &str =
    "MedlinePlus.gov - Official Medical Database (official reference)";

/// Fetches and interprets the reference document for a drug.
pub struct ReferenceScraper {
    urls: Arc<ReferenceUrlTable>,
    fetcher: Arc<dyn DocumentFetcher>,
    classifier: Arc<dyn ContentClassifier>,
    adapter: GenerativeAdapter,
}

impl ReferenceScraper {
    pub fn new(
        urls: Arc<ReferenceUrlTable>,
        fetcher: Arc<dyn DocumentFetcher>,
        classifier: Arc<dyn ContentClassifier>,
        adapter: GenerativeAdapter,
    ) -> Self {
        Self {
            urls,
            fetcher,
            classifier,
            adapter,
        }
    }

    /// Rendered verdict text, or `None` when the reference has nothing to say.
    pub fn fetch(&self, canonical_drug: &str, food: &str) -> Option<String> {
        self.fetch_verdict(canonical_drug, food).map(|v| v.render())
    }

    /// Structured verdict, or `None` when the reference has nothing to say.
    pub fn fetch_verdict(&self, canonical_drug: &str, food: &str) -> Option<InteractionVerdict> {
        let key = lookup_key(canonical_drug);
        let Some(url) = self.urls.get(&key) else {
            tracing::info!(drug = %canonical_drug, key = %key, "No reference URL for drug");
            return None;
        };

        let html = match self.fetcher.fetch(url) {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Reference fetch failed");
                return None;
            }
        };

        let food = food.trim();
        let extracted = extract_sections(&html, Some(food).filter(|f| !f.is_empty()));
        if extracted.is_empty() {
            tracing::info!(drug = %key, "No food interaction content in reference");
            return None;
        }
        if extracted.food_filter_fallback {
            tracing::debug!(
                drug = %key,
                food = %food,
                food_filter_fallback = true,
                "No section mentions food; keeping all sections"
            );
        }
        tracing::info!(
            drug = %key,
            sections = extracted.sections.len(),
            fallback_scan = extracted.used_fallback_scan,
            "Found relevant reference sections"
        );

        let text = extracted.joined();
        let classification = self.classifier.classify(&text);
        let reason = self.explain(&text, canonical_drug, food);
        let food_label = if food.is_empty() {
            "this food".to_string()
        } else {
            food.to_lowercase()
        };

        Some(InteractionVerdict {
            risk_level: classification.risk_level,
            has_interaction: classification.has_interaction(),
            recommended_action: classification.action,
            interaction_note: "Found in official medical database".into(),
            recommendation_note: format!(
                "{} {}",
                classification.action.as_str().to_lowercase(),
                food_label
            ),
            reason,
            source_tag: SourceTag::Official,
            provenance: OFFICIAL_PROVENANCE.into(),
        })
    }

    fn explain(&self, text: &str, drug: &str, food: &str) -> String {
        let food = if food.is_empty() { "this food" } else { food };
        match self.adapter.summarize(text, drug, food) {
            Ok(summary) => summary,
            Err(e) => {
                tracing::debug!(error = %e, "Summary unavailable, truncating reference text");
                truncate_with_ellipsis(text, FALLBACK_REASON_CHARS)
            }
        }
    }
}

/// First `max_chars` characters, with `...` appended when text was cut.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RecommendedAction, RiskLevel};
    use drug_food_llm::MockGenerator;
    use proptest::prelude::*;

    const ATORVASTATIN_URL: &str = "https://medlineplus.gov/druginfo/meds/a600045.html";

    const ATORVASTATIN_HTML: &str = r#"
        <html><body>
        <h2>What special dietary instructions should I follow?</h2>
        <p>Avoid drinking large amounts of grapefruit juice while taking this medication.</p>
        <h2>What side effects can this medication cause?</h2>
        <p>Muscle pain.</p>
        </body></html>
    "#;

    fn scraper(fetcher: Arc<FixtureFetcher>, adapter: GenerativeAdapter) -> ReferenceScraper {
        ReferenceScraper::new(
            Arc::new(ReferenceUrlTable::from_pairs([("atorvastatin", ATORVASTATIN_URL)])),
            fetcher,
            Arc::new(KeywordClassifier),
            adapter,
        )
    }

    #[test]
    fn test_no_url_means_no_fetch() {
        let fetcher = Arc::new(FixtureFetcher::new());
        let scraper = scraper(fetcher.clone(), GenerativeAdapter::unavailable());

        assert!(scraper.fetch("heparin", "grapefruit").is_none());
        assert_eq!(fetcher.call_count(), 0);
    }

    #[test]
    fn test_fetch_failure_is_none() {
        let fetcher = Arc::new(FixtureFetcher::new());
        let scraper = scraper(fetcher.clone(), GenerativeAdapter::unavailable());

        assert!(scraper.fetch("atorvastatin", "grapefruit").is_none());
        assert_eq!(fetcher.call_count(), 1);
    }

    #[test]
    fn test_verdict_from_standardized_name() {
        let fetcher =
            Arc::new(FixtureFetcher::new().with_document(ATORVASTATIN_URL, ATORVASTATIN_HTML));
        let mock = Arc::new(MockGenerator::new("\"Skip grapefruit juice with this drug.\""));
        let scraper = scraper(fetcher, GenerativeAdapter::new(mock.clone()));

        let verdict = scraper
            .fetch_verdict("atorvastatin 80 MG Oral Tablet [Lipitor]", "Grapefruit")
            .unwrap();

        assert_eq!(verdict.risk_level, RiskLevel::High);
        assert_eq!(verdict.recommended_action, RecommendedAction::Avoid);
        assert!(verdict.has_interaction);
        assert_eq!(verdict.reason, "Skip grapefruit juice with this drug.");
        assert_eq!(verdict.recommendation_note, "avoid grapefruit");
        assert_eq!(verdict.source_tag, SourceTag::Official);
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn test_summary_failure_truncates() {
        let fetcher =
            Arc::new(FixtureFetcher::new().with_document(ATORVASTATIN_URL, ATORVASTATIN_HTML));
        let scraper = scraper(fetcher, GenerativeAdapter::new(Arc::new(MockGenerator::failing())));

        let verdict = scraper.fetch_verdict("atorvastatin", "grapefruit").unwrap();
        assert!(verdict.reason.ends_with("..."));
        assert_eq!(verdict.reason.chars().count(), FALLBACK_REASON_CHARS + 3);
        assert!(verdict.reason.starts_with("What special dietary instructions"));
    }

    #[test]
    fn test_document_without_food_content() {
        let fetcher = Arc::new(FixtureFetcher::new().with_document(
            ATORVASTATIN_URL,
            "<html><body><h1>Dosage</h1><p>Take once daily.</p></body></html>",
        ));
        let scraper = scraper(fetcher, GenerativeAdapter::unavailable());

        assert!(scraper.fetch("atorvastatin", "grapefruit").is_none());
    }

    #[test]
    fn test_rendered_text_has_provenance() {
        let fetcher =
            Arc::new(FixtureFetcher::new().with_document(ATORVASTATIN_URL, ATORVASTATIN_HTML));
        let scraper = scraper(fetcher, GenerativeAdapter::unavailable());

        let text = scraper.fetch("atorvastatin", "").unwrap();
        assert!(text.contains("**RISK LEVEL**: High"));
        assert!(text.contains("**RECOMMENDATION**: Avoid - avoid this food"));
        assert!(text.contains("official reference"));
    }

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate_with_ellipsis("short", 100), "short");
        assert_eq!(truncate_with_ellipsis("abcdef", 3), "abc...");
    }

    proptest! {
        #[test]
        fn truncate_respects_char_budget(s in "\\PC{0,200}", n in 0usize..150) {
            let out = truncate_with_ellipsis(&s, n);
            prop_assert!(out.chars().count() <= n + 3);
        }
    }
}
