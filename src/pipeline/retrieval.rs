//! Retrieval stage: the single worker that resolves every candidate item to a local file.
//!
//! Exactly one instance runs per pipeline, whatever the number of terms: the asset server
//! throttles concurrent downloads.

use anyhow::Result;
use crossbeam_channel::Receiver;
use log::{debug, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::engine::cache::{CacheLookup, SoundCache};
use crate::engine::fetch::AssetSource;
use crate::{CatalogItem, ResolvedItem};

use super::context::FirstError;
use super::error_handler::{has_failed, record_first_error};
use super::router::Router;

/// Counters for one retrieval run. `cached + fetched + failed == seen`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RetrievalStats {
    /// Candidate items taken from the intake.
    pub seen: usize,
    /// Resolved from the local cache.
    pub cached: usize,
    /// Resolved by a successful fetch.
    pub fetched: usize,
    /// Dropped because the fetch or the cache write failed.
    pub failed: usize,
    /// Resolved but not delivered because the stream's player was gone.
    pub undelivered: usize,
}

impl RetrievalStats {
    pub fn resolved(&self) -> usize {
        self.cached + self.fetched
    }
}

/// Resolve one item: cache hit, or fetch into the cache.
fn resolve(
    item: &CatalogItem,
    cache: &SoundCache,
    assets: &dyn AssetSource,
    stats: &mut RetrievalStats,
) -> Result<PathBuf> {
    match cache.lookup(&item.name) {
        CacheLookup::Hit(path) => {
            info!("Cached: {:?} {}", item.term, item.description);
            stats.cached += 1;
            Ok(path)
        }
        CacheLookup::Miss(_) => {
            info!("Fetch: {:?} {}", item.term, item.description);
            let path = cache.store(&item.name, assets)?;
            stats.fetched += 1;
            Ok(path)
        }
    }
}

/// Drain `intake` until every source is done, resolving and routing each item.
/// Failed retrievals are logged and dropped. Closes `router` on return, whatever the outcome.
pub fn run_retrieval(
    intake: Receiver<CatalogItem>,
    router: &Router,
    cache: &SoundCache,
    assets: &dyn AssetSource,
    first_error: &FirstError,
) -> RetrievalStats {
    let _close = router.close_on_drop();
    let mut stats = RetrievalStats::default();

    while let Ok(item) = intake.recv() {
        if has_failed(first_error) {
            debug!("retrieval: fatal error recorded, stopping");
            break;
        }
        stats.seen += 1;

        let path = match resolve(&item, cache, assets, &mut stats) {
            Ok(path) => path,
            Err(e) => {
                warn!("Error:Download {:?} {}: {:#}", item.term, item.name, e);
                stats.failed += 1;
                continue;
            }
        };

        let resolved = ResolvedItem::new(item, path);
        let stream = match router.route(resolved.term()) {
            Ok(tx) => tx,
            Err(e) => {
                record_first_error(first_error, format!("{:#}", e));
                break;
            }
        };
        // May block while the stream is full; the router lock is not held here.
        if let Err(e) = stream.send(resolved) {
            warn!("No player for {:?}, dropping {}", e.0.term(), e.0.item.name);
            stats.undelivered += 1;
        }
    }

    debug!(
        "retrieval: intake closed, {} seen ({} cached, {} fetched, {} failed)",
        stats.seen, stats.cached, stats.fetched, stats.failed
    );
    stats
}

/// Spawn the retrieval stage. The caller must drop every intake sender it holds (other than the
/// sources') so the stage can see the end of input.
pub fn spawn_retrieval_thread(
    intake: Receiver<CatalogItem>,
    router: Arc<Router>,
    cache: SoundCache,
    assets: Arc<dyn AssetSource>,
    first_error: FirstError,
) -> JoinHandle<RetrievalStats> {
    thread::spawn(move || run_retrieval(intake, &router, &cache, assets.as_ref(), &first_error))
}
