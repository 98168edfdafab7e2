//! Drug-Food Core Library
//!
//! Resolves whether a drug and a food interact, preferring an authoritative
//! reference, then a generative narrative, then a static rule table.
//!
//! # Architecture
//!
//! ```text
//! raw drug ─► Name normalization ─► canonical drug
//!             (aliases → cache → RxNav search → concept lookup)
//!                                        │
//!                        ┌───────────────▼───────────────┐
//!                        │   Official reference scraper  │──► official
//!                        └───────────────┬───────────────┘
//!                                        │ nothing found
//!                        ┌───────────────▼───────────────┐
//!                        │     Generative narrative      │──► ai
//!                        └───────────────┬───────────────┘
//!                                        │ declined / unavailable
//!                        ┌───────────────▼───────────────┐
//!                        │        Rule predictor         │──► ml
//!                        └───────────────────────────────┘
//! ```
//!
//! Any failure in the chain is reported as `error` with the raw drug name.
//!
//! # Modules
//!
//! - [`config`]: Checker configuration and environment overrides
//! - [`db`]: SQLite storage for the drug name cache
//! - [`models`]: Verdicts, reports and interaction rules
//! - [`tables`]: Static knowledge tables (aliases, reference URLs, rules, food categories)
//! - [`normalize`]: Drug name normalization
//! - [`reference`]: Authoritative reference scraper
//! - [`predictor`]: Rule-based predictor
//! - [`resolver`]: Resolution orchestrator

pub mod config;
pub mod db;
pub mod models;
pub mod normalize;
pub mod predictor;
pub mod reference;
pub mod resolver;
pub mod tables;

// Re-export commonly used types
pub use config::CheckerConfig;
pub use db::Database;
pub use models::{InteractionReport, InteractionVerdict, RecommendedAction, RiskLevel, SourceTag};
pub use normalize::{DrugNameCache, NameResolver};
pub use predictor::RulePredictor;
pub use reference::ReferenceScraper;
pub use resolver::InteractionResolver;
pub use tables::KnowledgeBase;

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::path::PathBuf;
use std::sync::Arc;

use drug_food_llm::{GeminiClient, GenerativeAdapter};
use tracing_subscriber::EnvFilter;

use normalize::RxNavClient;
use reference::{HttpDocumentFetcher, KeywordClassifier};

/// Log filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "drug_food_core=info,drug_food_llm=info";

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum DrugFoodError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Table error: {0}")]
    TableError(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}

impl From<db::DbError> for DrugFoodError {
    fn from(e: db::DbError) -> Self {
        DrugFoodError::DatabaseError(e.to_string())
    }
}

impl From<tables::TableError> for DrugFoodError {
    fn from(e: tables::TableError) -> Self {
        DrugFoodError::TableError(e.to_string())
    }
}

impl From<normalize::LookupError> for DrugFoodError {
    fn from(e: normalize::LookupError) -> Self {
        DrugFoodError::NetworkError(e.to_string())
    }
}

impl From<reference::FetchError> for DrugFoodError {
    fn from(e: reference::FetchError) -> Self {
        DrugFoodError::NetworkError(e.to_string())
    }
}

impl From<drug_food_llm::GenerationError> for DrugFoodError {
    fn from(e: drug_food_llm::GenerationError) -> Self {
        DrugFoodError::NetworkError(e.to_string())
    }
}

impl From<anyhow::Error> for DrugFoodError {
    fn from(e: anyhow::Error) -> Self {
        DrugFoodError::ConfigError(format!("{:#}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open a checker with explicit configuration.
#[uniffi::export]
pub fn open_checker(config: FfiCheckerConfig) -> Result<Arc<InteractionChecker>, DrugFoodError> {
    let checker = InteractionChecker::from_config(&config.into())?;
    Ok(Arc::new(checker))
}

/// Open a checker configured from the process environment.
#[uniffi::export]
pub fn open_checker_from_env() -> Result<Arc<InteractionChecker>, DrugFoodError> {
    let config = CheckerConfig::from_env()?;
    Ok(Arc::new(InteractionChecker::from_config(&config)?))
}

/// Install the global tracing subscriber. Later calls are no-ops.
#[uniffi::export]
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_ok() {
        tracing::info!("Drug-food checker logging initialized v{}", env!("CARGO_PKG_VERSION"));
    }
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe interaction checker for FFI.
#[derive(uniffi::Object)]
pub struct InteractionChecker {
    resolver: InteractionResolver,
    names: Arc<NameResolver>,
    cache: Arc<DrugNameCache>,
}

#[uniffi::export]
impl InteractionChecker {
    /// Resolve a drug-food pair to `(source, text, canonical drug)`.
    pub fn check_interaction(&self, drug: String, food: String) -> FfiInteractionResult {
        self.check(&drug, &food).into()
    }

    /// Canonical generic name for a drug, as used by `check_interaction`.
    pub fn normalize_drug(&self, drug: String) -> String {
        self.names.resolve(&drug)
    }

    /// Number of names in the persistent cache.
    pub fn cached_name_count(&self) -> u64 {
        self.cache.len() as u64
    }
}

impl InteractionChecker {
    /// Wire up the standard pipeline from configuration.
    pub fn from_config(config: &CheckerConfig) -> Result<Self, DrugFoodError> {
        let kb = match &config.reference_table_path {
            Some(path) => KnowledgeBase::with_reference_file(path)?,
            None => KnowledgeBase::bundled()?,
        };

        let cache = Arc::new(DrugNameCache::open(&config.cache_path)?);
        if let Some(legacy) = &config.legacy_cache_json {
            if let Err(e) = cache.import_json(legacy) {
                tracing::warn!(path = %legacy.display(), error = %e, "Legacy cache import failed");
            }
        }

        let terminology = RxNavClient::new(&config.rxnav_base_url, config.http_timeout_secs)?;
        let names = Arc::new(NameResolver::new(
            Arc::new(kb.aliases),
            cache.clone(),
            Arc::new(terminology),
        ));

        let adapter = match &config.gemini_api_key {
            Some(key) => GenerativeAdapter::new(Arc::new(GeminiClient::new(
                key,
                config.gemini_models.clone(),
                config.generation_timeout_secs,
            )?)),
            None => {
                tracing::info!("No generation key configured, narrative source disabled");
                GenerativeAdapter::unavailable()
            }
        };

        let scraper = ReferenceScraper::new(
            Arc::new(kb.reference_urls),
            Arc::new(HttpDocumentFetcher::new(config.http_timeout_secs)?),
            Arc::new(KeywordClassifier),
            adapter.clone(),
        );
        let predictor = RulePredictor::new(Arc::new(kb.interactions), Arc::new(kb.categories));
        let resolver = InteractionResolver::standard(names.clone(), scraper, adapter, predictor);

        tracing::info!(
            cache_path = %config.cache_path.display(),
            cached_names = cache.len(),
            stages = ?resolver.stages(),
            "Interaction checker ready"
        );

        Ok(Self {
            resolver,
            names,
            cache,
        })
    }

    /// Resolve a drug-food pair. Never fails.
    pub fn check(&self, drug: &str, food: &str) -> InteractionReport {
        self.resolver.check(drug, food)
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe checker configuration. Unset optionals take the defaults.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCheckerConfig {
    pub cache_path: String,
    pub reference_table_path: Option<String>,
    pub legacy_cache_json: Option<String>,
    pub rxnav_base_url: Option<String>,
    pub http_timeout_secs: Option<u64>,
    pub gemini_api_key: Option<String>,
    pub gemini_models: Vec<String>,
    pub generation_timeout_secs: Option<u64>,
}

impl From<FfiCheckerConfig> for CheckerConfig {
    fn from(ffi: FfiCheckerConfig) -> Self {
        let defaults = CheckerConfig::default();
        CheckerConfig {
            cache_path: PathBuf::from(ffi.cache_path),
            reference_table_path: ffi.reference_table_path.map(PathBuf::from),
            legacy_cache_json: ffi.legacy_cache_json.map(PathBuf::from),
            rxnav_base_url: ffi.rxnav_base_url.unwrap_or(defaults.rxnav_base_url),
            http_timeout_secs: ffi.http_timeout_secs.unwrap_or(defaults.http_timeout_secs),
            gemini_api_key: ffi
                .gemini_api_key
                .filter(|k| !k.trim().is_empty() && k != config::PLACEHOLDER_API_KEY),
            gemini_models: if ffi.gemini_models.is_empty() {
                defaults.gemini_models
            } else {
                ffi.gemini_models
            },
            generation_timeout_secs: ffi
                .generation_timeout_secs
                .unwrap_or(defaults.generation_timeout_secs),
        }
    }
}

/// FFI-safe interaction result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiInteractionResult {
    /// One of `official`, `ai`, `ml`, `error`
    pub source: String,
    pub text: String,
    pub canonical_drug: String,
}

impl From<InteractionReport> for FfiInteractionResult {
    fn from(report: InteractionReport) -> Self {
        Self {
            source: report.source.as_str().to_string(),
            text: report.text,
            canonical_drug: report.canonical_drug,
        }
    }
}
