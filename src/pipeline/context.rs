//! Pipeline context: collaborators, intake channel and the shared first-error slot.

use crossbeam_channel::{Receiver, Sender, bounded};
use std::sync::{Arc, Mutex};

use crate::CatalogItem;
use crate::engine::cache::SoundCache;
use crate::engine::catalog::Catalog;
use crate::engine::fetch::AssetSource;
use crate::engine::render::Renderer;
use crate::utils::config::INTAKE_CAPACITY;

/// First fatal error seen by any task. Once set, retrieval and players stop taking new work.
pub type FirstError = Arc<Mutex<Option<String>>>;

pub fn new_first_error() -> FirstError {
    Arc::new(Mutex::new(None))
}

/// External collaborators the pipeline drives. Cheap to clone (shared handles).
#[derive(Clone)]
pub struct Collaborators {
    pub catalog: Arc<dyn Catalog>,
    pub assets: Arc<dyn AssetSource>,
    pub cache: SoundCache,
    pub renderer: Arc<dyn Renderer>,
}

/// Intake shared by every query source and drained by the single retrieval stage.
/// The receiver sees `Err` only once every source sender is dropped and the queue is empty.
pub struct PipelineChannels {
    pub intake_tx: Sender<CatalogItem>,
    pub intake_rx: Receiver<CatalogItem>,
}

pub fn create_pipeline_channels() -> PipelineChannels {
    let (intake_tx, intake_rx) = bounded::<CatalogItem>(INTAKE_CAPACITY);
    PipelineChannels {
        intake_tx,
        intake_rx,
    }
}
