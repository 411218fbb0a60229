//! Pipeline components: query sources, retrieval, routing, playback and the orchestrator.

pub mod context;
pub mod error_handler;
pub mod orchestrator;
pub mod player;
pub mod preview;
pub mod retrieval;
pub mod router;
pub mod source;

pub use context::{Collaborators, FirstError, PipelineChannels, create_pipeline_channels};
pub use error_handler::check_for_first_error;
pub use orchestrator::{Pipeline, PipelineConfig, PipelineReport};
pub use player::{PlayerReport, run_player, spawn_player_thread};
pub use preview::{preview, preview_line};
pub use retrieval::{RetrievalStats, run_retrieval, spawn_retrieval_thread};
pub use router::{Router, RouterStats, RoutingPolicy};
pub use source::{SourceReport, run_source, spawn_sources};
