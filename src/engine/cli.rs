//! CLI command handler: resolve the work dir, merge `thames.toml` and flags, run.

use anyhow::Result;
use log::{debug, info};

use crate::Opts;
use crate::engine::arg_parser::Cli;
use crate::engine::bootstrap::resolve_work_dir;
use crate::utils::setup_logging;
use crate::utils::thames_toml::{apply_file_to_opts, load_thames_toml};
use crate::{Mode, play};

fn setup_opts(cli: &Cli) -> Result<Opts> {
    setup_logging(cli.verbose);
    let root = resolve_work_dir(cli.root.as_deref())?;
    debug!("Work directory: {}", root.display());

    let mut opts = Opts::default();
    if let Some(file) = load_thames_toml(&root) {
        apply_file_to_opts(&file, &mut opts);
    }
    opts.root_dir = Some(root);
    if let Some(n) = cli.limit {
        opts.limit = n;
    }
    opts.mode = cli.mode();
    opts.download_only = cli.download_only;
    opts.verbose = cli.verbose;
    Ok(opts)
}

/// Run the queries in the mode selected by the flags. Per-sound failures are logged, not returned.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let opts = setup_opts(cli)?;
    let report = play(&opts, &cli.queries)?;
    if opts.mode != Mode::Query {
        info!(
            "Done: {} played, {} failed download(s), {} failed playback(s)",
            report.played(),
            report.retrieval.failed,
            report.players.iter().map(|p| p.failed).sum::<usize>()
        );
    }
    Ok(())
}
