//! Public and internal types for the thames API and pipeline.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::utils::config::{DEFAULT_ASSETS_ROOT, DEFAULT_LIMIT, STREAM_CAPACITY, Player};

/// One search result from the catalog. Immutable once produced by a query source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogItem {
    /// Location of the sound in the catalog (also its filename in the cache and on the asset server).
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Nominal duration in seconds. Only used for logging.
    pub secs: u64,
    /// Search term that produced this item. Used to route it to a stream.
    pub term: String,
}

impl CatalogItem {
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.secs)
    }
}

/// A [`CatalogItem`] whose payload is confirmed on local disk.
///
/// Only the retrieval stage builds these, after a cache hit or a successful fetch.
#[derive(Clone, Debug)]
pub struct ResolvedItem {
    pub item: CatalogItem,
    pub path: PathBuf,
}

impl ResolvedItem {
    pub(crate) fn new(item: CatalogItem, path: PathBuf) -> Self {
        Self { item, path }
    }

    pub fn term(&self) -> &str {
        &self.item.term
    }
}

/// Key used by the router to pick a stream.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RoutingKey {
    /// Every item shares the one stream of the run (sequential and interleave).
    Shared,
    /// Each search term owns its stream (mix).
    Term(String),
}

impl fmt::Display for RoutingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutingKey::Shared => write!(f, "<shared>"),
            RoutingKey::Term(t) => write!(f, "{t:?}"),
        }
    }
}

/// Pipeline topology, fixed for the whole run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Terms are queried one after another into a single stream.
    #[default]
    Sequential,
    /// Terms are queried concurrently into a single stream.
    Interleave,
    /// Terms are queried concurrently, each into its own stream and player.
    Mix,
    /// Print the results with their cache status; no retrieval, no playback.
    Query,
}

impl Mode {
    /// True when every term's source runs concurrently with the others.
    pub fn concurrent_sources(self) -> bool {
        matches!(self, Mode::Interleave | Mode::Mix)
    }
}

/// Full options for a run (CLI + optional `thames.toml`).
#[derive(Clone, Debug)]
pub struct Opts {
    /// Work directory override. When None, resolved from `THAMES_ROOT` or the user cache dir.
    pub root_dir: Option<PathBuf>,
    /// Max number of sounds per search term.
    pub limit: usize,
    pub mode: Mode,
    /// Download and log sounds but never invoke the player.
    pub download_only: bool,
    /// External player used to render each sound.
    pub player: Player,
    /// Base URL of the asset server. Sound names are appended verbatim.
    pub assets_root: String,
    /// Capacity of each playback stream.
    pub stream_capacity: usize,
    /// Debug logging and progress counters.
    pub verbose: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Opts {
            root_dir: None,
            limit: DEFAULT_LIMIT,
            mode: Mode::default(),
            download_only: false,
            player: Player::default(),
            assets_root: DEFAULT_ASSETS_ROOT.to_string(),
            stream_capacity: STREAM_CAPACITY,
            verbose: false,
        }
    }
}
