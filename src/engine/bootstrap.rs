//! Work directory preparation: resolve the root, fetch the csv and build the catalog on first run.

use anyhow::{Context, Result};
use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::engine::cache::SoundCache;
use crate::engine::catalog::init_catalog;
use crate::engine::fetch::AssetSource;
use crate::utils::config::{PackagePaths, WorkDirLayout};
use crate::utils::write_atomically;

fn env_root() -> Option<PathBuf> {
    let var = PackagePaths::get().root_env_var();
    std::env::var(var)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

/// Read the root override: env var → `.env` in the current directory.
fn try_env_then_dotenv() -> Option<PathBuf> {
    if let Some(p) = env_root() {
        return Some(p);
    }
    let env_path = Path::new(".env");
    if env_path.is_file() {
        let _ = dotenvy::from_path(env_path);
        return env_root();
    }
    None
}

/// Resolve the work directory: CLI `-r` → `THAMES_ROOT` (env or `.env`) → `<user cache dir>/thames`.
pub fn resolve_work_dir(cli_root: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = cli_root {
        return Ok(p.to_path_buf());
    }
    if let Some(p) = try_env_then_dotenv() {
        debug!("Work directory from environment: {}", p.display());
        return Ok(p);
    }
    let cache = dirs::cache_dir().context("no user cache directory on this platform")?;
    Ok(cache.join(PackagePaths::get().pkg_name()))
}

/// Create the work directory structure. On first use, downloads the csv from `source` and
/// builds the catalog from it. The csv and the catalog are written under temporary names and
/// renamed into place, so an interrupted first run is retried from scratch next time.
pub fn prepare_work_dir(
    root: &Path,
    source: &dyn AssetSource,
    verbose: bool,
) -> Result<WorkDirLayout> {
    let layout = WorkDirLayout::new(root);
    std::fs::create_dir_all(&layout.root)
        .with_context(|| format!("create work directory {}", layout.root.display()))?;
    SoundCache::new(&layout.sounds_dir).ensure_dir()?;

    if !layout.csv_file.exists() {
        info!(
            "Downloading index {}",
            source.locate(WorkDirLayout::CSV_NAME)
        );
        write_atomically(&layout.csv_file, |out| {
            source.fetch(WorkDirLayout::CSV_NAME, out)
        })
        .context("download sounds csv")?;
    }

    if !layout.db_file.exists() {
        build_catalog(&layout.db_file, &layout.csv_file, verbose)?;
    }

    Ok(layout)
}

/// Build the catalog at `db_file` from `csv_file` via a temp file + rename.
fn build_catalog(db_file: &Path, csv_file: &Path, verbose: bool) -> Result<()> {
    info!("Initializing database {}", db_file.display());
    let tmp = crate::utils::partial_path_for(db_file);
    let _ = std::fs::remove_file(&tmp);

    let result = (|| -> Result<()> {
        let csv = std::fs::File::open(csv_file)
            .with_context(|| format!("open {}", csv_file.display()))?;
        let mut conn = rusqlite::Connection::open(&tmp)
            .with_context(|| format!("create catalog {}", tmp.display()))?;
        let n = init_catalog(&mut conn, std::io::BufReader::new(csv), verbose)?;
        conn.close()
            .map_err(|(_, e)| e)
            .context("close catalog")?;
        info!("Indexed {} sounds", n);
        crate::utils::rename_partial_to_final(&tmp, db_file)
    })();

    if result.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    result
}
