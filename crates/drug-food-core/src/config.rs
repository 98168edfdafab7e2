//! Checker configuration.
//!
//! Defaults suit a local run; every field can be overridden through the
//! environment (`DRUG_FOOD_*`, plus `GEMINI_API_KEY`).

use std::path::PathBuf;

use anyhow::Context;
use drug_food_llm::DEFAULT_GEMINI_MODELS;

use crate::normalize::DEFAULT_RXNAV_BASE_URL;

pub const DEFAULT_CACHE_PATH: &str = "data/drug_cache.sqlite3";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 30;

/// Value shipped in sample environment files; treated as no key.
pub const PLACEHOLDER_API_KEY: &str = "your_gemini_api_key_here";

#[derive(Debug, Clone, PartialEq)]
pub struct CheckerConfig {
    pub cache_path: PathBuf,
    /// Replaces the bundled drug → reference URL table
    pub reference_table_path: Option<PathBuf>,
    /// JSON cache from an earlier deployment, imported on open
    pub legacy_cache_json: Option<PathBuf>,
    pub rxnav_base_url: String,
    pub http_timeout_secs: u64,
    pub gemini_api_key: Option<String>,
    pub gemini_models: Vec<String>,
    pub generation_timeout_secs: u64,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            cache_path: PathBuf::from(DEFAULT_CACHE_PATH),
            reference_table_path: None,
            legacy_cache_json: None,
            rxnav_base_url: DEFAULT_RXNAV_BASE_URL.to_string(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            gemini_api_key: None,
            gemini_models: DEFAULT_GEMINI_MODELS.iter().map(|m| m.to_string()).collect(),
            generation_timeout_secs: DEFAULT_GENERATION_TIMEOUT_SECS,
        }
    }
}

impl CheckerConfig {
    /// Defaults overridden by process environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(val) = var("DRUG_FOOD_CACHE_PATH") {
            config.cache_path = PathBuf::from(val);
        }
        if let Some(val) = var("DRUG_FOOD_REFERENCE_TABLE") {
            config.reference_table_path = Some(PathBuf::from(val));
        }
        if let Some(val) = var("DRUG_FOOD_LEGACY_CACHE") {
            config.legacy_cache_json = Some(PathBuf::from(val));
        }
        if let Some(val) = var("DRUG_FOOD_RXNAV_URL") {
            config.rxnav_base_url = val.trim_end_matches('/').to_string();
        }
        if let Some(val) = var("DRUG_FOOD_HTTP_TIMEOUT_SECS") {
            config.http_timeout_secs = val
                .parse()
                .with_context(|| format!("DRUG_FOOD_HTTP_TIMEOUT_SECS is not a number: {val}"))?;
        }
        if let Some(val) = var("GEMINI_API_KEY") {
            if val != PLACEHOLDER_API_KEY {
                config.gemini_api_key = Some(val);
            }
        }
        if let Some(val) = var("DRUG_FOOD_GEMINI_MODELS") {
            let models: Vec<String> = val
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(String::from)
                .collect();
            if !models.is_empty() {
                config.gemini_models = models;
            }
        }
        if let Some(val) = var("DRUG_FOOD_GENERATION_TIMEOUT_SECS") {
            config.generation_timeout_secs = val.parse().with_context(|| {
                format!("DRUG_FOOD_GENERATION_TIMEOUT_SECS is not a number: {val}")
            })?;
        }

        Ok(config)
    }
}
