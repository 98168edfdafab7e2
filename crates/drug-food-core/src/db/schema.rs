//! SQLite schema definition.

/// Complete database schema for the drug name cache.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Drug Name Cache
-- ============================================================================

CREATE TABLE IF NOT EXISTS drug_name_cache (
    query TEXT PRIMARY KEY,                       -- lowercased, trimmed user query
    canonical TEXT NOT NULL,                      -- resolved generic name
    source TEXT NOT NULL,                         -- search | concept_lookup | imported
    resolved_at TEXT NOT NULL                     -- RFC 3339
);
"#;
