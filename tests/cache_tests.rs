//! Cache and work directory tests: presence test, atomic store, first-run bootstrap.

use anyhow::Result;
use std::io::Write;
use std::sync::Mutex;
use thames::engine::{AssetSource, CacheLookup, SoundCache, prepare_work_dir, resolve_work_dir};
use thames::utils::{WorkDirLayout, partial_path_for, write_atomically};

/// Serves fixed bytes for every name, or fails after writing part of them.
struct StaticAssets {
    body: Vec<u8>,
    fail: bool,
    requests: Mutex<Vec<String>>,
}

impl StaticAssets {
    fn new(body: &[u8], fail: bool) -> Self {
        Self {
            body: body.to_vec(),
            fail,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl AssetSource for StaticAssets {
    fn locate(&self, name: &str) -> String {
        format!("static://{name}")
    }

    fn fetch(&self, name: &str, dest: &mut dyn Write) -> Result<u64> {
        self.requests.lock().unwrap().push(name.to_string());
        let half = self.body.len() / 2;
        dest.write_all(&self.body[..half])?;
        if self.fail {
            anyhow::bail!("connection reset while fetching {name}");
        }
        dest.write_all(&self.body[half..])?;
        Ok(self.body.len() as u64)
    }
}

const CSV: &str = "location,description,secs,category,CDNumber,CDName,tracknum\n\
07000001.wav,Cafe chatter.,120,Cafes,BBC 01,Ambience 1,1\n\
07000004.wav,Manual typewriter.,30,Office,BBC 02,Office Sounds,1\n";

// --- SoundCache ---

#[test]
fn test_lookup_hit_and_miss() {
    let dir = tempfile::tempdir().unwrap();
    let cache = SoundCache::new(dir.path());
    std::fs::write(dir.path().join("a.wav"), b"x").unwrap();

    assert_eq!(
        cache.lookup("a.wav"),
        CacheLookup::Hit(dir.path().join("a.wav"))
    );
    let miss = cache.lookup("b.wav");
    assert!(!miss.is_hit());
    assert_eq!(miss.path(), dir.path().join("b.wav"));
}

#[test]
fn test_store_writes_complete_file() {
    let dir = tempfile::tempdir().unwrap();
    let cache = SoundCache::new(dir.path());
    let assets = StaticAssets::new(b"RIFF....WAVEfmt ", false);

    let path = cache.store("c.wav", &assets).unwrap();
    assert_eq!(path, dir.path().join("c.wav"));
    assert_eq!(std::fs::read(&path).unwrap(), b"RIFF....WAVEfmt ");
    assert!(!partial_path_for(&path).exists());
    assert!(cache.lookup("c.wav").is_hit());
}

#[test]
fn test_failed_store_leaves_nothing_behind() {
    let dir = tempfile::tempdir().unwrap();
    let cache = SoundCache::new(dir.path());
    let assets = StaticAssets::new(b"RIFF....WAVEfmt ", true);

    assert!(cache.store("d.wav", &assets).is_err());
    let path = dir.path().join("d.wav");
    assert!(!path.exists());
    assert!(!partial_path_for(&path).exists());
    assert!(!cache.lookup("d.wav").is_hit());
}

#[test]
fn test_write_atomically_keeps_previous_file_on_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("index.csv");
    std::fs::write(&path, b"old").unwrap();

    let result: Result<()> = write_atomically(&path, |out| {
        out.write_all(b"new but incomplete")?;
        anyhow::bail!("interrupted")
    });
    assert!(result.is_err());
    assert_eq!(std::fs::read(&path).unwrap(), b"old");
}

#[test]
fn test_store_rejects_names_leaving_the_cache() {
    let root = tempfile::tempdir().unwrap();
    let sounds = root.path().join("sounds");
    std::fs::create_dir(&sounds).unwrap();
    let cache = SoundCache::new(&sounds);
    let assets = StaticAssets::new(b"RIFF", false);

    for name in ["../escaped.wav", "/tmp/abs.wav", "a/../../b.wav", ""] {
        assert!(cache.store(name, &assets).is_err(), "{name:?} must be rejected");
        assert!(!cache.lookup(name).is_hit());
    }
    assert!(!root.path().join("escaped.wav").exists());
    assert!(assets.requests().is_empty());

    // Nested relative names stay inside the cache.
    let nested = cache.store("cd01/track.wav", &assets).unwrap();
    assert!(nested.starts_with(&sounds));
    assert!(cache.lookup("cd01/track.wav").is_hit());
}

// --- work directory ---

#[test]
fn test_resolve_work_dir_prefers_cli() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(resolve_work_dir(Some(dir.path())).unwrap(), dir.path());
}

#[test]
fn test_prepare_work_dir_builds_catalog_once() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("thames");
    let assets = StaticAssets::new(CSV.as_bytes(), false);

    let layout = prepare_work_dir(&root, &assets, false).unwrap();
    assert!(layout.sounds_dir.is_dir());
    assert!(layout.csv_file.is_file());
    assert!(layout.db_file.is_file());
    assert!(!partial_path_for(&layout.db_file).exists());
    assert_eq!(assets.requests(), vec![WorkDirLayout::CSV_NAME.to_string()]);

    let conn = thames::engine::open_catalog(&layout.db_file).unwrap();
    assert_eq!(thames::engine::catalog::catalog_size(&conn), Some(2));

    // Second run reuses csv and catalog.
    prepare_work_dir(&root, &assets, false).unwrap();
    assert_eq!(assets.requests().len(), 1);
}

#[test]
fn test_prepare_work_dir_fails_when_index_download_fails() {
    let dir = tempfile::tempdir().unwrap();
    let assets = StaticAssets::new(CSV.as_bytes(), true);
    assert!(prepare_work_dir(dir.path(), &assets, false).is_err());
    let layout = WorkDirLayout::new(dir.path());
    assert!(!layout.csv_file.exists());
    assert!(!layout.db_file.exists());
}
