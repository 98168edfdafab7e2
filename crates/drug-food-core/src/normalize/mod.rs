//! Drug name normalization.
//!
//! Order: alias table → persistent cache → terminology search → concept id
//! lookup. Every failure degrades to the input name; nothing here returns an
//! error to the caller.

mod cache;
mod rxnav;

pub use cache::*;
pub use rxnav::*;

use std::sync::Arc;

use crate::db::NameSource;
use crate::tables::DrugAliasTable;

/// Resolves free-text drug names to canonical generic names.
pub struct NameResolver {
    aliases: Arc<DrugAliasTable>,
    cache: Arc<DrugNameCache>,
    terminology: Arc<dyn TerminologyService>,
}

impl NameResolver {
    pub fn new(
        aliases: Arc<DrugAliasTable>,
        cache: Arc<DrugNameCache>,
        terminology: Arc<dyn TerminologyService>,
    ) -> Self {
        Self {
            aliases,
            cache,
            terminology,
        }
    }

    /// Canonical generic name for `raw`. Never fails.
    pub fn resolve(&self, raw: &str) -> String {
        let name = raw.trim();
        if name.is_empty() {
            return raw.to_string();
        }

        if let Some(generic) = self.aliases.lookup(name) {
            tracing::debug!(drug = %name, generic = %generic, "Alias table hit");
            return generic.to_string();
        }

        if let Some(cached) = self.cache.get(name) {
            tracing::debug!(drug = %name, canonical = %cached, "Drug name cache hit");
            return cached;
        }

        let resolved = self
            .search(name)
            .map(|n| (n, NameSource::Search))
            .or_else(|| self.concept_lookup(name).map(|n| (n, NameSource::ConceptLookup)));

        match resolved {
            Some((canonical, source)) => {
                if canonical != name {
                    if let Err(e) = self.cache.put(name, &canonical, source) {
                        tracing::warn!(drug = %name, error = %e, "Failed to persist resolved name");
                    }
                    tracing::info!(
                        drug = %name,
                        canonical = %canonical,
                        %source,
                        "Standardized drug name"
                    );
                }
                canonical
            }
            None => {
                tracing::info!(drug = %name, "No standardized name found, using input");
                raw.to_string()
            }
        }
    }

    /// Preferred search candidate. A candidate that only echoes the query
    /// is not a resolution.
    fn search(&self, name: &str) -> Option<String> {
        match self.terminology.search_concepts(name) {
            Ok(candidates) => select_candidate(&candidates)
                .map(|c| c.name.trim())
                .filter(|found| found.to_lowercase() != name.to_lowercase())
                .map(str::to_string),
            Err(e) => {
                tracing::warn!(drug = %name, error = %e, "Terminology search failed");
                None
            }
        }
    }

    fn concept_lookup(&self, name: &str) -> Option<String> {
        let id = match self.terminology.concept_id(name) {
            Ok(Some(id)) => id,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(drug = %name, error = %e, "Concept id lookup failed");
                return None;
            }
        };

        match self.terminology.concept_name(&id) {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(
                    drug = %name,
                    concept_id = %id,
                    error = %e,
                    "Concept name lookup failed"
                );
                None
            }
        }
    }
}
