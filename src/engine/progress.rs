//! Progress counter for the one-time catalog build.

use kdam::{Animation, Bar, BarExt};
use std::sync::{Arc, Mutex};

// Progress bar type alias
pub type ProgressBar = Arc<Mutex<Bar>>;

/// Force a refresh of the bar (e.g. so counter shows "0 records" immediately).
pub fn refresh_bar(pb: &ProgressBar) {
    if let Ok(mut bar) = pb.try_lock() {
        let _ = bar.refresh();
    }
}

/// Create a counter for unknown total (shows count without percentage)
pub fn create_counter(desc: &'static str, unit: &'static str) -> ProgressBar {
    Arc::new(Mutex::new(kdam::tqdm!(
        total = 0,
        desc = desc,
        animation = Animation::Classic,
        position = 0,
        unit = unit
    )))
}

/// Update progress bar if available
/// Uses try_lock so a contended bar never blocks the caller; it catches up on the next update.
pub fn update_progress_bar(pb: &ProgressBar, n: usize) {
    if let Ok(mut pb) = pb.try_lock() {
        let _ = pb.update(n);
    }
}

/// Update `pb` by `chunk_size` each time `count` completes a chunk.
pub fn report_progress_batched(pb: Option<&ProgressBar>, count: usize, chunk_size: usize) {
    if let Some(pb) = pb
        && count > 0
        && count.is_multiple_of(chunk_size)
    {
        update_progress_bar(pb, chunk_size);
    }
}

/// Final progress update for the remainder after batched updates.
pub fn flush_progress_remainder(pb: Option<&ProgressBar>, total: usize, chunk_size: usize) {
    if let Some(pb) = pb {
        let remaining = total % chunk_size;
        if remaining > 0 {
            update_progress_bar(pb, remaining);
        }
        eprintln!();
    }
}
