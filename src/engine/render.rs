//! Rendering collaborator: the external command that plays one sound.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

use crate::utils::config::Player;

/// Renders one local payload, synchronously.
pub trait Renderer: Send + Sync {
    fn render(&self, path: &Path) -> Result<()>;
}

/// Runs `program args... <path>` and waits for it. Non-zero exit is an error.
pub struct CommandRenderer {
    player: Player,
}

impl CommandRenderer {
    pub fn new(player: Player) -> Self {
        Self { player }
    }
}

impl Renderer for CommandRenderer {
    fn render(&self, path: &Path) -> Result<()> {
        let status = Command::new(&self.player.program)
            .args(&self.player.args)
            .arg(path)
            .status()
            .with_context(|| format!("run {}", self.player.program))?;
        if !status.success() {
            anyhow::bail!("{} {}: {}", self.player.program, path.display(), status);
        }
        Ok(())
    }
}

/// Renders nothing. Used for download-only runs, where playback is just the log line.
pub struct SilentRenderer;

impl Renderer for SilentRenderer {
    fn render(&self, _path: &Path) -> Result<()> {
        Ok(())
    }
}
