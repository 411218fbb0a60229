//! Fake collaborators shared by the integration tests.
#![allow(dead_code)]

use anyhow::Result;
use crossbeam_channel::Sender;
use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread::ThreadId;

use thames::engine::{AssetSource, Catalog, Renderer, SoundCache};
use thames::pipeline::{Collaborators, Pipeline, PipelineConfig};
use thames::{CatalogItem, Mode};

/// Term that makes [`FakeCatalog::search`] fail like a malformed query would.
pub const BAD_TERM: &str = "NEAR(";

/// In-memory catalog: term → names. Names double as descriptions.
#[derive(Default)]
pub struct FakeCatalog {
    items: HashMap<String, Vec<String>>,
}

impl FakeCatalog {
    /// `count` items per term, named `<term>-<i>.wav`.
    pub fn with_terms(terms: &[&str], count: usize) -> Self {
        let items = terms
            .iter()
            .map(|t| (t.to_string(), (1..=count).map(|i| sound_name(t, i)).collect()))
            .collect();
        Self { items }
    }
}

pub fn sound_name(term: &str, i: usize) -> String {
    format!("{term}-{i}.wav")
}

/// Term encoded in a name built by [`sound_name`].
pub fn term_of(name: &str) -> &str {
    name.rsplit_once('-').map(|(t, _)| t).unwrap_or(name)
}

impl Catalog for FakeCatalog {
    fn search(&self, term: &str, limit: usize, out: &Sender<CatalogItem>) -> Result<usize> {
        if term == BAD_TERM {
            anyhow::bail!("malformed MATCH expression: [{}]", term);
        }
        let mut sent = 0;
        for name in self.items.get(term).into_iter().flatten().take(limit) {
            let item = CatalogItem {
                name: name.clone(),
                description: format!("sound {name}"),
                secs: 3,
                term: term.to_string(),
            };
            if out.send(item).is_err() {
                break;
            }
            sent += 1;
        }
        Ok(sent)
    }
}

/// Asset source that writes the name as payload, failing for names in `failing`.
#[derive(Default)]
pub struct FakeAssets {
    failing: HashSet<String>,
    fetched: Mutex<Vec<String>>,
}

impl FakeAssets {
    pub fn failing(names: &[&str]) -> Self {
        Self {
            failing: names.iter().map(|s| s.to_string()).collect(),
            fetched: Mutex::new(Vec::new()),
        }
    }

    /// Names fetched so far (successful or not), in order.
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

impl AssetSource for FakeAssets {
    fn locate(&self, name: &str) -> String {
        format!("fake://assets/{name}")
    }

    fn fetch(&self, name: &str, dest: &mut dyn Write) -> Result<u64> {
        self.fetched.lock().unwrap().push(name.to_string());
        // Half a payload first, so a failure leaves something behind to clean up.
        dest.write_all(b"RIFF")?;
        if self.failing.contains(name) {
            anyhow::bail!("Response from {} is 404", self.locate(name));
        }
        dest.write_all(name.as_bytes())?;
        Ok(4 + name.len() as u64)
    }
}

/// Records every render call with the calling thread; fails for names in `failing`.
#[derive(Default)]
pub struct RecordingRenderer {
    failing: HashSet<String>,
    calls: Mutex<Vec<(ThreadId, String)>>,
}

impl RecordingRenderer {
    pub fn failing(names: &[&str]) -> Self {
        Self {
            failing: names.iter().map(|s| s.to_string()).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// File names rendered, in call order.
    pub fn rendered(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, n)| n.clone())
            .collect()
    }

    /// Rendered file names grouped by the player thread that rendered them.
    pub fn by_thread(&self) -> HashMap<ThreadId, Vec<String>> {
        let mut map: HashMap<ThreadId, Vec<String>> = HashMap::new();
        for (id, name) in self.calls.lock().unwrap().iter() {
            map.entry(*id).or_default().push(name.clone());
        }
        map
    }
}

impl Renderer for RecordingRenderer {
    fn render(&self, path: &Path) -> Result<()> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.calls
            .lock()
            .unwrap()
            .push((std::thread::current().id(), name.clone()));
        if self.failing.contains(&name) {
            anyhow::bail!("play {}: exit status: 2", path.display());
        }
        Ok(())
    }
}

/// Put a payload for each name in the cache directory.
pub fn precache(dir: &Path, names: &[String]) {
    for n in names {
        std::fs::write(dir.join(n), b"cached").unwrap();
    }
}

pub struct Harness {
    pub cache_dir: tempfile::TempDir,
    pub assets: Arc<FakeAssets>,
    pub renderer: Arc<RecordingRenderer>,
    pub catalog: Arc<FakeCatalog>,
}

impl Harness {
    pub fn new(catalog: FakeCatalog, assets: FakeAssets, renderer: RecordingRenderer) -> Self {
        Self {
            cache_dir: tempfile::tempdir().unwrap(),
            assets: Arc::new(assets),
            renderer: Arc::new(renderer),
            catalog: Arc::new(catalog),
        }
    }

    pub fn cache_path(&self) -> PathBuf {
        self.cache_dir.path().to_path_buf()
    }

    pub fn pipeline(&self, mode: Mode, limit: usize) -> Pipeline {
        self.pipeline_with(PipelineConfig {
            mode,
            limit,
            stream_capacity: 4,
            download_only: false,
        })
    }

    pub fn pipeline_with(&self, config: PipelineConfig) -> Pipeline {
        let collab = Collaborators {
            catalog: self.catalog.clone(),
            assets: self.assets.clone(),
            cache: SoundCache::new(self.cache_dir.path()),
            renderer: self.renderer.clone(),
        };
        Pipeline::new(config, collab)
    }
}

pub fn terms(ts: &[&str]) -> Vec<String> {
    ts.iter().map(|s| s.to_string()).collect()
}
