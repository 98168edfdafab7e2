//! Drug name cache operations.

use std::fmt;
use std::str::FromStr;

use rusqlite::params;
use serde::{Deserialize, Serialize};

use super::{Database, DbError, DbResult};

/// How a cached name was resolved.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NameSource {
    /// Candidate from the terminology drug search
    Search,
    /// Display name of a concept id
    ConceptLookup,
    /// Merged from a legacy JSON cache file
    Imported,
}

impl NameSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            NameSource::Search => "search",
            NameSource::ConceptLookup => "concept_lookup",
            NameSource::Imported => "imported",
        }
    }
}

impl fmt::Display for NameSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NameSource {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "search" => Ok(NameSource::Search),
            "concept_lookup" => Ok(NameSource::ConceptLookup),
            "imported" => Ok(NameSource::Imported),
            other => Err(DbError::InvalidValue(format!("unknown name source: {}", other))),
        }
    }
}

/// One persisted query → canonical name resolution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CachedName {
    /// Lowercased, trimmed query
    pub query: String,
    pub canonical: String,
    pub source: NameSource,
    /// RFC 3339 timestamp
    pub resolved_at: String,
}

impl CachedName {
    pub fn new(query: &str, canonical: &str, source: NameSource) -> Self {
        Self {
            query: query.trim().to_lowercase(),
            canonical: canonical.to_string(),
            source,
            resolved_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl Database {
    /// Insert or replace a cached name. Autocommitted, so durable on return.
    pub fn upsert_cached_name(&self, entry: &CachedName) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO drug_name_cache (query, canonical, source, resolved_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(query) DO UPDATE SET
                canonical = excluded.canonical,
                source = excluded.source,
                resolved_at = excluded.resolved_at
            "#,
            params![
                entry.query,
                entry.canonical,
                entry.source.as_str(),
                entry.resolved_at,
            ],
        )?;
        Ok(())
    }

    /// Load every cached name.
    pub fn load_cached_names(&self) -> DbResult<Vec<CachedName>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT query, canonical, source, resolved_at
            FROM drug_name_cache
            ORDER BY query
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (query, canonical, source, resolved_at) = row?;
            entries.push(CachedName {
                query,
                canonical,
                source: source.parse()?,
                resolved_at,
            });
        }
        Ok(entries)
    }
}
