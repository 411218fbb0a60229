use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::utils::config::PARTIAL_SUFFIX;

/// Get the partial (in-progress) path for a file, next to it: `<name>.part`.
pub fn partial_path_for(final_path: &Path) -> PathBuf {
    let name = final_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    final_path
        .parent()
        .unwrap_or(Path::new("."))
        .join(format!("{name}.{PARTIAL_SUFFIX}"))
}

pub fn rename_partial_to_final(partial_path: &Path, final_path: &Path) -> Result<()> {
    fs::rename(partial_path, final_path).with_context(|| {
        format!(
            "atomic rename partial file to final path ({} -> {})",
            partial_path.display(),
            final_path.display()
        )
    })
}

/// Write `final_path` through its partial path: `fill` writes the content, then the partial
/// file is renamed into place. On any error the partial file is removed and `final_path` is
/// left untouched, so a half-written file never shows up under the final name.
pub fn write_atomically<T, F>(final_path: &Path, fill: F) -> Result<T>
where
    F: FnOnce(&mut dyn Write) -> Result<T>,
{
    let partial = partial_path_for(final_path);
    let result = (|| -> Result<T> {
        let file = fs::File::create(&partial)
            .with_context(|| format!("create {}", partial.display()))?;
        let mut out = std::io::BufWriter::new(file);
        let value = fill(&mut out)?;
        out.flush()
            .with_context(|| format!("flush {}", partial.display()))?;
        drop(out);
        rename_partial_to_final(&partial, final_path)?;
        Ok(value)
    })();
    if result.is_err() {
        let _ = fs::remove_file(&partial);
    }
    result
}
