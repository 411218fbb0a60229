//! Local sound cache: one file per catalog name under the sounds directory.

use anyhow::{Context, Result};
use log::debug;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::engine::fetch::AssetSource;
use crate::utils::write_atomically;

/// Result of a cache presence test.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CacheLookup {
    Hit(PathBuf),
    Miss(PathBuf),
}

impl CacheLookup {
    pub fn path(&self) -> &Path {
        match self {
            CacheLookup::Hit(p) | CacheLookup::Miss(p) => p,
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, CacheLookup::Hit(_))
    }
}

#[derive(Clone, Debug)]
pub struct SoundCache {
    dir: PathBuf,
}

impl SoundCache {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    /// Create the cache directory if missing.
    pub fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create sounds directory {}", self.dir.display()))
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Path for `name`, refusing names that would leave the cache directory.
    fn checked_path(&self, name: &str) -> Result<PathBuf> {
        let rel = Path::new(name);
        let plain = rel.components().next().is_some()
            && rel.components().all(|c| matches!(c, Component::Normal(_)));
        if !plain {
            anyhow::bail!("invalid sound name {:?}", name);
        }
        Ok(self.path_for(name))
    }

    /// Presence test. A stat error other than "not found" is logged and treated as a miss,
    /// and so is a name that does not stay inside the cache directory.
    pub fn lookup(&self, name: &str) -> CacheLookup {
        let path = match self.checked_path(name) {
            Ok(p) => p,
            Err(e) => {
                debug!("{:#}", e);
                return CacheLookup::Miss(self.path_for(name));
            }
        };
        match std::fs::metadata(&path) {
            Ok(_) => CacheLookup::Hit(path),
            Err(e) if e.kind() == ErrorKind::NotFound => CacheLookup::Miss(path),
            Err(e) => {
                debug!("stat {}: {} (treating as not cached)", path.display(), e);
                CacheLookup::Miss(path)
            }
        }
    }

    /// Fetch `name` from `source` into the cache. The file only appears under its final
    /// name once fully written. Returns the final path.
    pub fn store(&self, name: &str, source: &dyn AssetSource) -> Result<PathBuf> {
        let path = self.checked_path(name)?;
        if let Some(parent) = path.parent()
            && parent != self.dir
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        write_atomically(&path, |out| source.fetch(name, out))?;
        Ok(path)
    }
}
