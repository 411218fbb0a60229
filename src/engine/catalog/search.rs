//! Full-text search over the catalog.

use anyhow::{Context, Result};
use crossbeam_channel::Sender;
use rusqlite::Connection;
use rusqlite::types::ValueRef;
use std::path::{Path, PathBuf};

use crate::CatalogItem;

use super::SEARCH_SQL;
use super::connection::open_catalog;

/// A searchable catalog of sounds.
///
/// `search` streams at most `limit` items for `term` into `out`, in the store's order, each
/// tagged with `term`. It returns how many were sent. When `out` has no receiver left the
/// search stops early without error. A malformed term or an unreachable store is an error.
pub trait Catalog: Send + Sync {
    fn search(&self, term: &str, limit: usize, out: &Sender<CatalogItem>) -> Result<usize>;
}

/// Catalog backed by the sqlite full-text index on disk.
/// Every search opens its own connection so concurrent sources never share one.
pub struct SqliteCatalog {
    db_path: PathBuf,
}

impl SqliteCatalog {
    pub fn new(db_path: &Path) -> Self {
        Self {
            db_path: db_path.to_path_buf(),
        }
    }
}

impl Catalog for SqliteCatalog {
    fn search(&self, term: &str, limit: usize, out: &Sender<CatalogItem>) -> Result<usize> {
        let conn = open_catalog(&self.db_path)?;
        search_catalog(&conn, term, limit, |item| out.send(item).is_ok())
    }
}

/// Duration column is text in the csv; anything unparsable counts as 0.
fn secs_from(value: ValueRef<'_>) -> u64 {
    match value {
        ValueRef::Integer(i) => i.max(0) as u64,
        ValueRef::Real(f) if f > 0.0 => f as u64,
        ValueRef::Text(t) => std::str::from_utf8(t)
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(0),
        _ => 0,
    }
}

/// Run the search statement and hand each row to `on_item` as it is read.
/// `on_item` returns false to stop early. Returns the number of items handed over.
pub fn search_catalog<F>(conn: &Connection, term: &str, limit: usize, mut on_item: F) -> Result<usize>
where
    F: FnMut(CatalogItem) -> bool,
{
    let mut stmt = conn.prepare(SEARCH_SQL).context("prepare search")?;
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let mut rows = stmt
        .query(rusqlite::params![term, limit])
        .with_context(|| format!("query catalog for {term:?}"))?;

    let mut count = 0_usize;
    while let Some(row) = rows
        .next()
        .with_context(|| format!("query catalog for {term:?}"))?
    {
        let item = CatalogItem {
            name: row.get(0)?,
            description: row.get(1)?,
            secs: secs_from(row.get_ref(2)?),
            term: term.to_string(),
        };
        if !on_item(item) {
            break;
        }
        count += 1;
    }
    Ok(count)
}
