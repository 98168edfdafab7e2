//! Generic drug name → reference document URL table.

use std::collections::HashMap;
use std::path::Path;

use super::{TableError, TableResult};

/// Reference table shipped with the crate.
const BUNDLED_REFERENCE_URLS: &str = include_str!("../../data/reference_urls.json");

/// Immutable mapping from lookup key to an authoritative document URL.
#[derive(Debug, Clone, Default)]
pub struct ReferenceUrlTable {
    urls: HashMap<String, String>,
}

impl ReferenceUrlTable {
    /// The bundled table.
    pub fn bundled() -> TableResult<Self> {
        Self::from_json_str(BUNDLED_REFERENCE_URLS)
    }

    /// Parse a flat JSON object `{ "generic": "https://..." }`.
    pub fn from_json_str(json: &str) -> TableResult<Self> {
        let raw: HashMap<String, String> = serde_json::from_str(json)?;
        Ok(Self::from_pairs(raw))
    }

    /// Load a table maintained outside the crate.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> TableResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|source| TableError::Io {
            path: path.as_ref().display().to_string(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            urls: pairs
                .into_iter()
                .map(|(k, v)| (k.as_ref().trim().to_lowercase(), v.into()))
                .collect(),
        }
    }

    /// URL for a lookup key (case-insensitive).
    pub fn get(&self, key: &str) -> Option<&str> {
        self.urls.get(&key.trim().to_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
