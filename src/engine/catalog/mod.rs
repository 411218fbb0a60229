//! Catalog store: schema, open/build, full-text search.

mod connection;
mod search;

pub use connection::{catalog_size, init_catalog, open_catalog, open_catalog_in_memory};
pub use search::{Catalog, SqliteCatalog, search_catalog};

/// Full-text table for the sounds csv. Only description, category and CD name are tokenized.
pub(crate) const SCHEMA: &str = r#"
CREATE VIRTUAL TABLE IF NOT EXISTS sounds USING fts4(
    location, description, secs, category, CDNumber, CDName, tracknum,
    tokenize=porter, notindexed=location, notindexed=secs, notindexed=CDNumber, notindexed=tracknum
);
"#;

/// Insert statement for one csv record.
pub(crate) const INSERT_SOUND_SQL: &str = "INSERT INTO sounds (location, description, secs, category, CDNumber, CDName, tracknum) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

/// Search statement: term is an FTS query applied verbatim; results are shuffled by the store.
pub(crate) const SEARCH_SQL: &str = "SELECT location, description, secs FROM sounds WHERE sounds MATCH ?1 ORDER BY RANDOM() LIMIT ?2";

/// Columns per csv record.
pub(crate) const CSV_COLUMNS: usize = 7;
