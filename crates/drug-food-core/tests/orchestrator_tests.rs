//! End-to-end tests for the resolution orchestrator.
//!
//! Network services are replaced with fixtures and counting doubles; the
//! static tables are the bundled ones.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use drug_food_core::models::SourceTag;
use drug_food_core::normalize::{
    ConceptCandidate, DrugNameCache, LookupError, LookupResult, NameResolver, TerminologyService,
};
use drug_food_core::predictor::RulePredictor;
use drug_food_core::reference::{
    Classification, ContentClassifier, FixtureFetcher, KeywordClassifier, ReferenceScraper,
};
use drug_food_core::resolver::{
    AttemptOutcome, InteractionResolver, NameNormalizer, NarrativeAttempt, OfficialAttempt,
    ResolutionAttempt, ResolveError, ResolveResult, RuleAttempt, ERROR_TEXT_PREFIX,
};
use drug_food_core::tables::KnowledgeBase;
use drug_food_llm::{GenerativeAdapter, MockGenerator};

const ATORVASTATIN_URL: &str = "https://medlineplus.gov/druginfo/meds/a600045.html";

const ATORVASTATIN_HTML: &str = r#"
    <html><body>
    <h2>What special dietary instructions should I follow?</h2>
    <p>Avoid drinking large amounts of grapefruit juice while taking atorvastatin.</p>
    <h2>What should I do if I forget a dose?</h2>
    <p>Take the missed dose as soon as you remember it.</p>
    </body></html>
"#;

/// Terminology service that is always unreachable.
struct OfflineTerminology;

impl TerminologyService for OfflineTerminology {
    fn search_concepts(&self, _name: &str) -> LookupResult<Vec<ConceptCandidate>> {
        Err(LookupError::HttpClient("offline".into()))
    }

    fn concept_id(&self, _name: &str) -> LookupResult<Option<String>> {
        Err(LookupError::HttpClient("offline".into()))
    }

    fn concept_name(&self, _concept_id: &str) -> LookupResult<Option<String>> {
        Err(LookupError::HttpClient("offline".into()))
    }
}

struct FailingNormalizer;

impl NameNormalizer for FailingNormalizer {
    fn normalize(&self, _raw: &str) -> ResolveResult<String> {
        Err(ResolveError::Normalization("terminology store corrupted".into()))
    }
}

struct FailingAttempt;

impl ResolutionAttempt for FailingAttempt {
    fn name(&self) -> &'static str {
        "official"
    }

    fn attempt(&self, _drug: &str, _food: &str) -> ResolveResult<Option<AttemptOutcome>> {
        Err(ResolveError::Attempt {
            stage: "official",
            message: "parser crashed".into(),
        })
    }
}

struct CrashingClassifier;

impl ContentClassifier for CrashingClassifier {
    fn classify(&self, _text: &str) -> Classification {
        panic!("classifier bug");
    }
}

/// Wraps an attempt and counts invocations.
struct Counting<A> {
    inner: A,
    calls: Arc<AtomicUsize>,
}

impl<A: ResolutionAttempt> ResolutionAttempt for Counting<A> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn attempt(&self, drug: &str, food: &str) -> ResolveResult<Option<AttemptOutcome>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.attempt(drug, food)
    }
}

struct Harness {
    resolver: InteractionResolver,
    narrative: Arc<MockGenerator>,
    rule_calls: Arc<AtomicUsize>,
}

fn normalizer() -> Arc<NameResolver> {
    let kb = KnowledgeBase::bundled().unwrap();
    Arc::new(NameResolver::new(
        Arc::new(kb.aliases),
        Arc::new(DrugNameCache::in_memory().unwrap()),
        Arc::new(OfflineTerminology),
    ))
}

fn harness(narrative_response: Option<&str>) -> Harness {
    let kb = KnowledgeBase::bundled().unwrap();
    let fetcher =
        Arc::new(FixtureFetcher::new().with_document(ATORVASTATIN_URL, ATORVASTATIN_HTML));
    let scraper = ReferenceScraper::new(
        Arc::new(kb.reference_urls),
        fetcher,
        Arc::new(KeywordClassifier),
        GenerativeAdapter::unavailable(),
    );

    let narrative = Arc::new(match narrative_response {
        Some(text) => MockGenerator::new(text),
        None => MockGenerator::failing(),
    });
    let predictor = RulePredictor::new(Arc::new(kb.interactions), Arc::new(kb.categories));
    let rule_calls = Arc::new(AtomicUsize::new(0));

    let resolver = InteractionResolver::new(
        normalizer(),
        vec![
            Box::new(OfficialAttempt::new(scraper)),
            Box::new(NarrativeAttempt::new(GenerativeAdapter::new(narrative.clone()))),
            Box::new(Counting {
                inner: RuleAttempt::new(predictor),
                calls: rule_calls.clone(),
            }),
        ],
    );

    Harness {
        resolver,
        narrative,
        rule_calls,
    }
}

#[test]
fn test_official_short_circuits_later_sources() {
    let h = harness(Some("Grapefruit raises statin levels."));

    let report = h.resolver.check("Lipitor", "grapefruit");
    assert_eq!(report.source, SourceTag::Official);
    assert_eq!(report.canonical_drug, "atorvastatin");
    assert!(report.text.contains("**RISK LEVEL**: High"));
    assert_eq!(h.narrative.call_count(), 0);
    assert_eq!(h.rule_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_narrative_used_without_reference() {
    let h = harness(Some("Vitamin K in kale can weaken warfarin."));

    let report = h.resolver.check("Coumadin", "kale");
    // No fixture document for warfarin, so the reference fetch fails.
    assert_eq!(report.source, SourceTag::Ai);
    assert_eq!(report.text, "Vitamin K in kale can weaken warfarin.");
    assert_eq!(report.canonical_drug, "warfarin");
    assert_eq!(h.rule_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_no_known_interaction_falls_to_rules() {
    let h = harness(Some("There is No Known Interaction between these."));

    let report = h.resolver.check("Zestril", "banana");
    assert_eq!(report.source, SourceTag::Ml);
    assert_eq!(report.canonical_drug, "lisinopril");
    assert!(report.text.contains("hyperkalemia") || report.text.contains("potassium"));
    assert_eq!(h.narrative.call_count(), 1);
    assert_eq!(h.rule_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_generation_failure_falls_to_rules() {
    let h = harness(None);

    let report = h.resolver.check("nardil", "aged_cheese");
    assert_eq!(report.source, SourceTag::Ml);
    assert_eq!(report.canonical_drug, "phenelzine");
    assert!(report.text.contains("**RISK LEVEL**: High"));
}

#[test]
fn test_unknown_pair_from_rules_is_safe() {
    let h = harness(None);

    let report = h.resolver.check("Xyzzy-9000", "water");
    assert_eq!(report.source, SourceTag::Ml);
    assert_eq!(report.canonical_drug, "Xyzzy-9000");
    assert!(report.text.contains("**RISK LEVEL**: None"));
}

#[test]
fn test_normalizer_failure_is_error_with_raw_drug() {
    let resolver = InteractionResolver::new(Arc::new(FailingNormalizer), vec![]);

    let report = resolver.check("  Lipitor ", "grapefruit");
    assert_eq!(report.source, SourceTag::Error);
    assert!(report.text.starts_with(ERROR_TEXT_PREFIX));
    assert!(report.text.contains("terminology store corrupted"));
    assert_eq!(report.canonical_drug, "  Lipitor ");
}

#[test]
fn test_attempt_failure_is_error_and_stops_chain() {
    let kb = KnowledgeBase::bundled().unwrap();
    let rule_calls = Arc::new(AtomicUsize::new(0));
    let resolver = InteractionResolver::new(
        normalizer(),
        vec![
            Box::new(FailingAttempt),
            Box::new(Counting {
                inner: RuleAttempt::new(RulePredictor::new(
                    Arc::new(kb.interactions),
                    Arc::new(kb.categories),
                )),
                calls: rule_calls.clone(),
            }),
        ],
    );

    let report = resolver.check("Lipitor", "grapefruit");
    assert_eq!(report.source, SourceTag::Error);
    assert!(report.text.contains("parser crashed"));
    assert_eq!(report.canonical_drug, "Lipitor");
    assert_eq!(rule_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_classifier_panic_is_error_with_raw_drug() {
    let kb = KnowledgeBase::bundled().unwrap();
    let fetcher =
        Arc::new(FixtureFetcher::new().with_document(ATORVASTATIN_URL, ATORVASTATIN_HTML));
    let scraper = ReferenceScraper::new(
        Arc::new(kb.reference_urls),
        fetcher,
        Arc::new(CrashingClassifier),
        GenerativeAdapter::unavailable(),
    );
    let resolver = InteractionResolver::standard(
        normalizer(),
        scraper,
        GenerativeAdapter::unavailable(),
        RulePredictor::new(Arc::new(kb.interactions), Arc::new(kb.categories)),
    );

    let report = resolver.check("Lipitor", "grapefruit");
    assert_eq!(report.source, SourceTag::Error);
    assert!(report.text.starts_with(ERROR_TEXT_PREFIX));
    assert!(report.text.contains("classifier bug"));
    assert_eq!(report.canonical_drug, "Lipitor");
}

#[test]
fn test_standard_chain_order() {
    let kb = KnowledgeBase::bundled().unwrap();
    let scraper = ReferenceScraper::new(
        Arc::new(kb.reference_urls),
        Arc::new(FixtureFetcher::new()),
        Arc::new(KeywordClassifier),
        GenerativeAdapter::unavailable(),
    );
    let resolver = InteractionResolver::standard(
        normalizer(),
        scraper,
        GenerativeAdapter::unavailable(),
        RulePredictor::new(Arc::new(kb.interactions), Arc::new(kb.categories)),
    );

    assert_eq!(resolver.stages(), vec!["official", "narrative", "rules"]);

    // Offline everywhere: rules answer.
    let report = resolver.check("Lipitor", "grapefruit juice");
    assert_eq!(report.source, SourceTag::Ml);
    assert!(report.text.contains("**RISK LEVEL**: High"));
}
