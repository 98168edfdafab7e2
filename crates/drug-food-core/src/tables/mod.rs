//! Static knowledge tables.
//!
//! All tables are immutable after construction. They are built once at
//! startup and shared by reference with the pipeline stages.

mod aliases;
mod interactions;
mod reference_urls;

pub use aliases::*;
pub use interactions::*;
pub use reference_urls::*;

use std::path::Path;

use thiserror::Error;

/// Table loading errors.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Cannot read table file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type TableResult<T> = Result<T, TableError>;

/// The full set of static tables the pipeline consumes.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    pub aliases: DrugAliasTable,
    pub reference_urls: ReferenceUrlTable,
    pub interactions: InteractionTable,
    pub categories: FoodCategoryTable,
}

impl KnowledgeBase {
    /// Tables shipped with the crate.
    pub fn bundled() -> TableResult<Self> {
        Ok(Self {
            aliases: DrugAliasTable::new(),
            reference_urls: ReferenceUrlTable::bundled()?,
            interactions: InteractionTable::new(),
            categories: FoodCategoryTable::new(),
        })
    }

    /// Bundled tables with the reference URL table read from `path`.
    pub fn with_reference_file<P: AsRef<Path>>(path: P) -> TableResult<Self> {
        Ok(Self {
            reference_urls: ReferenceUrlTable::from_json_file(path)?,
            ..Self::bundled()?
        })
    }
}
