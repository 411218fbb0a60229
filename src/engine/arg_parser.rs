use clap::{ArgGroup, Parser};
use std::path::PathBuf;

use crate::Mode;

/// Browser and player for the BBC Sound Effects collection.
///
/// Each query is an sqlite full-text query applied verbatim: usually a single term or a
/// phrase, NEAR queries work too. Sounds are downloaded in the background while playing.
#[derive(Clone, Debug, Parser)]
#[command(name = "thames")]
#[command(about = "Play sounds from cafes, markets, cars, typewriters, nature...")]
#[command(after_help = "Examples:
  thames cafe                       play sounds from cafes
  thames cafe typewriter            cafes, then typewriters
  thames --shuffle cafe typewriter  cafes and typewriters interleaved
  thames --mix wind rain water fire mixed together
  thames --query space              only list sounds from space")]
#[command(group(ArgGroup::new("mode").args(["query", "shuffle", "mix"])))]
pub struct Cli {
    /// Queries to play, in order.
    #[arg(value_name = "QUERIES", required = true, num_args = 1..)]
    pub queries: Vec<String>,

    /// Directory to store the index and the audio files. Default: user cache dir.
    #[arg(long, short = 'r', value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Number of sounds to play for each query.
    #[arg(short = 'n', value_name = "N")]
    pub limit: Option<usize>,

    /// Only query and print the results, don't download, don't play.
    #[arg(long)]
    pub query: bool,

    /// Only query and download the results, don't play.
    #[arg(long = "download-only", short = 'd')]
    pub download_only: bool,

    /// Interleave sounds from queries.
    #[arg(long)]
    pub shuffle: bool,

    /// Mix the sounds from queries.
    #[arg(long)]
    pub mix: bool,

    /// Verbose output.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl Cli {
    /// Mode selected by the flags. The arg group makes the flags mutually exclusive.
    pub fn mode(&self) -> Mode {
        if self.query {
            Mode::Query
        } else if self.mix {
            Mode::Mix
        } else if self.shuffle {
            Mode::Interleave
        } else {
            Mode::Sequential
        }
    }
}
