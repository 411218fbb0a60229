//! Load `thames.toml` from the work directory. The CLI merges it under its flags;
//! lib callers build [`Opts`] themselves.

use serde::Deserialize;
use std::path::Path;

use crate::Opts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub struct ThamesToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsSection {
    limit: Option<usize>,
    player: Option<String>,
    player_args: Option<Vec<String>>,
    assets_root: Option<String>,
    stream_capacity: Option<usize>,
}

/// Load `thames.toml` from `dir` if present. Returns None if file missing or unreadable.
pub fn load_thames_toml(dir: &Path) -> Option<ThamesToml> {
    let path = dir.join(PackagePaths::get().config_filename());
    let s = std::fs::read_to_string(&path).ok()?;
    parse_thames_toml(&s)
        .map_err(|e| log::warn!("{}: {}", path.display(), e))
        .ok()
}

pub fn parse_thames_toml(s: &str) -> Result<ThamesToml, toml::de::Error> {
    toml::from_str(s)
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($file:expr, $opts:expr, $file_field:ident => $opts_field:ident) => {
        if let Some(v) = $file.$file_field.clone() {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before applying CLI.
/// Mode, queries and verbosity are never read from the file.
pub fn apply_file_to_opts(file: &ThamesToml, opts: &mut Opts) {
    let s = &file.settings;
    apply_file_opt!(s, opts, limit => limit);
    apply_file_opt!(s, opts, assets_root => assets_root);
    apply_file_opt!(s, opts, stream_capacity => stream_capacity);
    if let Some(ref program) = s.player {
        opts.player.program = program.clone();
    }
    if let Some(ref args) = s.player_args {
        opts.player.args = args.clone();
    }
}
