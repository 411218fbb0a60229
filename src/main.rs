//! Thames CLI: query, download and play sound effects.

use anyhow::Result;
use clap::Parser;
use std::time::Instant;
use thames::engine::arg_parser::Cli;
use thames::engine::handle_run;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
