use anyhow::Result;
use std::sync::{MutexGuard, PoisonError};

use super::context::FirstError;

fn slot(first_error: &FirstError) -> MutexGuard<'_, Option<String>> {
    first_error.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Record `msg` unless an earlier error is already recorded.
pub fn record_first_error(first_error: &FirstError, msg: String) {
    let _ = slot(first_error).get_or_insert(msg);
}

/// True once any task recorded a fatal error.
pub fn has_failed(first_error: &FirstError) -> bool {
    slot(first_error).is_some()
}

/// Check pipeline result: if a fatal error was recorded, return it.
/// Call after joining every task.
pub fn check_for_first_error(first_error: &FirstError) -> Result<()> {
    if let Some(msg) = slot(first_error).take() {
        return Err(anyhow::anyhow!("{}", msg));
    }
    Ok(())
}
