//! Write-through drug name cache.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::db::{CachedName, Database, DbError, DbResult, NameSource};

struct CacheState {
    entries: HashMap<String, String>,
    db: Database,
}

/// Persistent query → canonical name cache.
///
/// The whole store is read into memory on open. Every `put` writes the
/// database row before updating memory, under a single lock, so readers never
/// see a name that is not yet durable.
pub struct DrugNameCache {
    state: Mutex<CacheState>,
}

impl DrugNameCache {
    /// Open (or create) the cache database at `path` and load all entries.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        Self::from_database(Database::open(path)?)
    }

    /// Non-durable cache (for testing).
    pub fn in_memory() -> DbResult<Self> {
        Self::from_database(Database::open_in_memory()?)
    }

    fn from_database(db: Database) -> DbResult<Self> {
        let entries: HashMap<String, String> = db
            .load_cached_names()?
            .into_iter()
            .map(|e| (e.query, e.canonical))
            .collect();
        tracing::info!(entries = entries.len(), "Loaded drug name cache");
        Ok(Self {
            state: Mutex::new(CacheState { entries, db }),
        })
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, CacheState>> {
        self.state
            .lock()
            .map_err(|e| DbError::LockPoisoned(e.to_string()))
    }

    /// Cached canonical name for a query (case-insensitive).
    pub fn get(&self, query: &str) -> Option<String> {
        let key = query.trim().to_lowercase();
        match self.lock() {
            Ok(state) => state.entries.get(&key).cloned(),
            Err(e) => {
                tracing::warn!(error = %e, "Drug name cache unavailable");
                None
            }
        }
    }

    /// Record a resolution and flush it to storage.
    pub fn put(&self, query: &str, canonical: &str, source: NameSource) -> DbResult<()> {
        let entry = CachedName::new(query, canonical, source);
        let mut state = self.lock()?;
        state.db.upsert_cached_name(&entry)?;
        state.entries.insert(entry.query, entry.canonical);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.lock().map(|s| s.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Merge a legacy flat JSON cache (`{ "query": "canonical" }`).
    ///
    /// Existing entries win. Returns the number of entries added.
    pub fn import_json<P: AsRef<Path>>(&self, path: P) -> DbResult<usize> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let legacy: HashMap<String, String> = serde_json::from_str(&contents)
            .map_err(|e| DbError::InvalidValue(format!("legacy cache: {}", e)))?;

        let mut state = self.lock()?;
        let mut added = 0;
        for (query, canonical) in legacy {
            let entry = CachedName::new(&query, &canonical, NameSource::Imported);
            if entry.query.is_empty() || state.entries.contains_key(&entry.query) {
                continue;
            }
            state.db.upsert_cached_name(&entry)?;
            state.entries.insert(entry.query, entry.canonical);
            added += 1;
        }
        tracing::info!(added, path = %path.as_ref().display(), "Imported legacy drug name cache");
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_put_then_get_case_insensitive() {
        let cache = DrugNameCache::in_memory().unwrap();
        assert!(cache.get("Lipitor 20").is_none());

        cache.put("Lipitor 20", "atorvastatin", NameSource::Search).unwrap();

        assert_eq!(cache.get("lipitor 20"), Some("atorvastatin".into()));
        assert_eq!(cache.get("  LIPITOR 20 "), Some("atorvastatin".into()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drug_cache.sqlite3");

        {
            let cache = DrugNameCache::open(&path).unwrap();
            cache.put("zocor", "simvastatin", NameSource::Search).unwrap();
        }

        let reopened = DrugNameCache::open(&path).unwrap();
        assert_eq!(reopened.get("zocor"), Some("simvastatin".into()));
    }

    #[test]
    fn test_import_json_keeps_existing() {
        let cache = DrugNameCache::in_memory().unwrap();
        cache.put("coumadin", "warfarin", NameSource::Search).unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"coumadin": "something else", "glucophage": "metformin", "": "ignored"}}"#
        )
        .unwrap();

        let added = cache.import_json(file.path()).unwrap();
        assert_eq!(added, 1);
        assert_eq!(cache.get("coumadin"), Some("warfarin".into()));
        assert_eq!(cache.get("glucophage"), Some("metformin".into()));
    }

    #[test]
    fn test_import_json_malformed() {
        let cache = DrugNameCache::in_memory().unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(cache.import_json(file.path()).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_writers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drug_cache.sqlite3");
        let cache = std::sync::Arc::new(DrugNameCache::open(&path).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    cache
                        .put(&format!("brand{}", i), &format!("generic{}", i), NameSource::Search)
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        drop(cache);
        let reopened = DrugNameCache::open(&path).unwrap();
        assert_eq!(reopened.len(), 8);
    }
}
