//! Playback workers: one per stream, rendering items in arrival order.

use crossbeam_channel::Receiver;
use log::{debug, info, warn};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::engine::render::Renderer;
use crate::{ResolvedItem, RoutingKey};

use super::context::FirstError;
use super::error_handler::has_failed;

/// What one player did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerReport {
    pub key: RoutingKey,
    /// Items rendered successfully.
    pub played: usize,
    /// Items whose rendering failed.
    pub failed: usize,
}

/// Drain `stream` until it is closed and empty. Rendering errors are logged and skipped.
pub fn run_player(
    key: RoutingKey,
    stream: Receiver<ResolvedItem>,
    renderer: &dyn Renderer,
    first_error: &FirstError,
) -> PlayerReport {
    let mut report = PlayerReport {
        key,
        played: 0,
        failed: 0,
    };
    for snd in stream.iter() {
        if has_failed(first_error) {
            debug!("player {}: fatal error recorded, stopping", report.key);
            break;
        }
        info!(
            "Playing: {:?} {} {:?} {}",
            snd.item.term,
            snd.item.description,
            snd.item.duration(),
            snd.path.display()
        );
        match renderer.render(&snd.path) {
            Ok(()) => report.played += 1,
            Err(e) => {
                warn!("Error:Play: {:#}", e);
                report.failed += 1;
            }
        }
    }
    debug!(
        "player {}: stream closed ({} played, {} failed)",
        report.key, report.played, report.failed
    );
    report
}

pub fn spawn_player_thread(
    key: RoutingKey,
    stream: Receiver<ResolvedItem>,
    renderer: Arc<dyn Renderer>,
    first_error: FirstError,
) -> JoinHandle<PlayerReport> {
    thread::spawn(move || run_player(key, stream, renderer.as_ref(), &first_error))
}
