//! Engine module: collaborators (catalog, assets, cache, player) and the CLI surface

pub mod arg_parser;
pub mod bootstrap;
pub mod cache;
pub mod catalog;
pub mod cli;
pub mod fetch;
pub mod progress;
pub mod render;

// Re-export commonly used items
pub use arg_parser::Cli;
pub use bootstrap::{prepare_work_dir, resolve_work_dir};
pub use cache::{CacheLookup, SoundCache};
pub use catalog::{Catalog, SqliteCatalog, init_catalog, open_catalog, open_catalog_in_memory};
pub use cli::handle_run;
pub use fetch::{AssetSource, HttpAssetSource, asset_url};
pub use render::{CommandRenderer, Renderer, SilentRenderer};
