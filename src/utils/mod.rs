pub mod config;
pub mod logger;
pub mod tempfiles;
pub mod thames_toml;

pub use config::*;
pub use logger::setup_logging;
pub use tempfiles::{partial_path_for, rename_partial_to_final, write_atomically};
