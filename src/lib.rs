//! Thames: browse and play the BBC Sound Effects collection

pub mod engine;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

use log::debug;
use std::sync::Arc;

use engine::{
    CommandRenderer, HttpAssetSource, SoundCache, SqliteCatalog, prepare_work_dir,
    resolve_work_dir,
};
use pipeline::{Collaborators, Pipeline, PipelineConfig, PipelineReport};

/// Result alias used by public thames API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single entry point: prepare the work directory (first run downloads the csv and builds the
/// catalog), then run `terms` through the pipeline in `opts.mode`.
///
/// Per-sound download and playback failures are logged and counted in the report; only fatal
/// errors (work dir, catalog, malformed query) are returned.
pub fn play(opts: &Opts, terms: &[String]) -> Result<PipelineReport> {
    let config_str = format!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_string().to_uppercase(),
        opts
    );
    debug!("{}", config_str);

    let root = resolve_work_dir(opts.root_dir.as_deref())?;
    let assets = Arc::new(HttpAssetSource::new(&opts.assets_root));
    let layout = prepare_work_dir(&root, assets.as_ref(), opts.verbose)?;

    let collab = Collaborators {
        catalog: Arc::new(SqliteCatalog::new(&layout.db_file)),
        assets,
        cache: SoundCache::new(&layout.sounds_dir),
        renderer: Arc::new(CommandRenderer::new(opts.player.clone())),
    };
    Pipeline::new(PipelineConfig::from(opts), collab).run(terms)
}
