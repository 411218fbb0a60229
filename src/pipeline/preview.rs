//! Query-only mode: print each result with its cache status. No retrieval, no playback.

use anyhow::{Context, Result};
use crossbeam_channel::bounded;
use std::io::Write;
use std::sync::Arc;
use std::thread;

use crate::CatalogItem;
use crate::engine::cache::{CacheLookup, SoundCache};
use crate::engine::catalog::Catalog;
use crate::engine::fetch::AssetSource;
use crate::utils::config::INTAKE_CAPACITY;

/// One preview line: description, then the local path when cached or the asset URL when not.
pub fn preview_line(item: &CatalogItem, cache: &SoundCache, assets: &dyn AssetSource) -> String {
    match cache.lookup(&item.name) {
        CacheLookup::Hit(path) => format!("{} {}", item.description, path.display()),
        CacheLookup::Miss(_) => format!("{} {}", item.description, assets.locate(&item.name)),
    }
}

/// Run every term's query in order and write one line per item to `out`.
/// Each source is drained fully before the next term starts. Returns the number of lines.
pub fn preview(
    catalog: &Arc<dyn Catalog>,
    cache: &SoundCache,
    assets: &dyn AssetSource,
    terms: &[String],
    limit: usize,
    out: &mut dyn Write,
) -> Result<usize> {
    let mut lines = 0_usize;
    for term in terms {
        let (tx, rx) = bounded::<CatalogItem>(INTAKE_CAPACITY);
        let catalog = Arc::clone(catalog);
        let query = term.clone();
        let handle = thread::spawn(move || catalog.search(&query, limit, &tx));

        let mut write_err = None;
        for item in rx.iter() {
            if let Err(e) = writeln!(out, "{}", preview_line(&item, cache, assets)) {
                write_err = Some(e);
                break;
            }
            lines += 1;
        }
        // Dropping the receiver unblocks the source if we stopped early.
        drop(rx);

        handle
            .join()
            .map_err(|_| anyhow::anyhow!("source thread panicked"))?
            .with_context(|| format!("query {term:?}"))?;
        if let Some(e) = write_err {
            return Err(e).context("write preview");
        }
    }
    out.flush().context("flush preview")?;
    Ok(lines)
}
