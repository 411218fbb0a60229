//! Application configuration constants.
//! Defaults, file names and tuning in one place.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    config_filename: String,
    root_env_var: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                config_filename: format!("{pkg}.toml"),
                root_env_var: format!("{}_ROOT", pkg.to_uppercase()),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// Optional settings file inside the work directory.
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    /// Environment variable overriding the work directory (e.g. `THAMES_ROOT`).
    pub fn root_env_var(&self) -> &str {
        &self.root_env_var
    }
}

// ---- Work directory layout ----

/// Files and directories under the work directory.
///
/// ```text
/// <work>/BBCSoundEffects.csv   the sounds csv from the asset server
/// <work>/sounds.db             sqlite full-text index built from the csv
/// <work>/sounds/               sounds downloaded on demand
/// ```
#[derive(Clone, Debug)]
pub struct WorkDirLayout {
    pub root: PathBuf,
    pub csv_file: PathBuf,
    pub db_file: PathBuf,
    pub sounds_dir: PathBuf,
}

impl WorkDirLayout {
    pub const CSV_NAME: &'static str = "BBCSoundEffects.csv";
    pub const DB_NAME: &'static str = "sounds.db";
    pub const SOUNDS_DIR_NAME: &'static str = "sounds";

    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            csv_file: root.join(Self::CSV_NAME),
            db_file: root.join(Self::DB_NAME),
            sounds_dir: root.join(Self::SOUNDS_DIR_NAME),
        }
    }
}

// ---- Player ----

/// External command that renders one sound: `program args... <path>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            program: "play".to_string(),
            args: vec!["-q".to_string()],
        }
    }
}

// ---- Pipeline ----

/// Default number of sounds per search term.
pub const DEFAULT_LIMIT: usize = 30;

/// Capacity of each playback stream. Ideally a function of download latency and the number
/// of queries; empirical for now.
pub const STREAM_CAPACITY: usize = 30;

/// Intake capacity. Zero: a source hands an item over only when retrieval takes it.
pub const INTAKE_CAPACITY: usize = 0;

// ---- Remote assets ----

/// Asset server root. Sound names and the csv name are appended verbatim.
pub const DEFAULT_ASSETS_ROOT: &str = "http://bbcsfx.acropolis.org.uk/assets/";

/// Suffix for files being written into the cache (renamed into place when complete).
pub const PARTIAL_SUFFIX: &str = "part";

// ---- Catalog ----

/// Batch size for progress counter updates while loading the csv into the catalog.
pub const CATALOG_PROGRESS_BATCH: usize = 1000;
