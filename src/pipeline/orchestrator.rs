use anyhow::Result;
use log::debug;
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::engine::render::{Renderer, SilentRenderer};
use crate::{Mode, Opts};

use super::context::{Collaborators, FirstError, create_pipeline_channels, new_first_error};
use super::error_handler::{check_for_first_error, record_first_error};
use super::player::{PlayerReport, spawn_player_thread};
use super::preview::preview;
use super::retrieval::{RetrievalStats, spawn_retrieval_thread};
use super::router::{Router, RouterStats, RoutingPolicy};
use super::source::{SourceReport, spawn_sources};

/// Everything a completed run did.
#[derive(Clone, Debug, Default)]
pub struct PipelineReport {
    pub sources: Vec<SourceReport>,
    pub retrieval: RetrievalStats,
    pub players: Vec<PlayerReport>,
    pub router: RouterStats,
}

impl PipelineReport {
    pub fn played(&self) -> usize {
        self.players.iter().map(|p| p.played).sum()
    }
}

/// Configuration fixed at construction: mode, per-term limit, stream capacity.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub mode: Mode,
    pub limit: usize,
    pub stream_capacity: usize,
    pub download_only: bool,
}

impl From<&Opts> for PipelineConfig {
    fn from(o: &Opts) -> Self {
        PipelineConfig {
            mode: o.mode,
            limit: o.limit,
            stream_capacity: o.stream_capacity,
            download_only: o.download_only,
        }
    }
}

/// Wires sources → intake → retrieval → router → streams → players for one run.
pub struct Pipeline {
    config: PipelineConfig,
    collab: Collaborators,
}

/// Handles for every task of a run, joined in [`Pipeline::run`].
struct PipelineHandles {
    sources: JoinHandle<Result<Vec<SourceReport>>>,
    retrieval: JoinHandle<RetrievalStats>,
    players: Vec<JoinHandle<PlayerReport>>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, collab: Collaborators) -> Self {
        Self { config, collab }
    }

    /// Run the pipeline for `terms` to completion.
    /// Query mode prints to stdout and returns an empty report.
    pub fn run(&self, terms: &[String]) -> Result<PipelineReport> {
        if self.config.mode == Mode::Query {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            preview(
                &self.collab.catalog,
                &self.collab.cache,
                self.collab.assets.as_ref(),
                terms,
                self.config.limit,
                &mut out,
            )?;
            return Ok(PipelineReport::default());
        }

        let first_error = new_first_error();
        let router = Arc::new(Router::new(
            RoutingPolicy::for_mode(self.config.mode),
            self.config.stream_capacity,
        ));
        let handles = self.start(terms, &router, &first_error)?;
        let report = shutdown_pipeline_handles(handles, &router, &first_error);
        check_for_first_error(&first_error)?;
        Ok(report)
    }

    /// Players first (so every stream exists with its worker), then retrieval, then sources.
    fn start(
        &self,
        terms: &[String],
        router: &Arc<Router>,
        first_error: &FirstError,
    ) -> Result<PipelineHandles> {
        let renderer: Arc<dyn Renderer> = if self.config.download_only {
            Arc::new(SilentRenderer)
        } else {
            Arc::clone(&self.collab.renderer)
        };

        let mut players = Vec::new();
        for term in stream_terms(router.policy(), terms) {
            let key = router.policy().key_for(&term);
            let stream = match router.subscribe(&term) {
                Ok(rx) => rx,
                Err(e) => {
                    // Release players already started.
                    router.close();
                    return Err(e);
                }
            };
            debug!("Starting player for {}", key);
            players.push(spawn_player_thread(
                key,
                stream,
                Arc::clone(&renderer),
                Arc::clone(first_error),
            ));
        }

        let channels = create_pipeline_channels();
        let retrieval = spawn_retrieval_thread(
            channels.intake_rx,
            Arc::clone(router),
            self.collab.cache.clone(),
            Arc::clone(&self.collab.assets),
            Arc::clone(first_error),
        );
        let sources = spawn_sources(
            terms.to_vec(),
            self.config.mode.concurrent_sources(),
            Arc::clone(&self.collab.catalog),
            self.config.limit,
            channels.intake_tx,
            Arc::clone(first_error),
        );

        Ok(PipelineHandles {
            sources,
            retrieval,
            players,
        })
    }
}

/// Terms that get a player: the one shared stream, or each distinct term in order.
fn stream_terms(policy: RoutingPolicy, terms: &[String]) -> Vec<String> {
    match policy {
        RoutingPolicy::SingleKey => vec![String::new()],
        RoutingPolicy::PerTerm => {
            let mut seen = std::collections::HashSet::new();
            terms
                .iter()
                .filter(|t| seen.insert(t.as_str()))
                .cloned()
                .collect()
        }
    }
}

/// Join every task bottom-up: sources, then retrieval (which closes the router), then players.
/// A panicked task is recorded as a fatal error once all tasks are joined.
fn shutdown_pipeline_handles(
    handles: PipelineHandles,
    router: &Router,
    first_error: &FirstError,
) -> PipelineReport {
    let mut report = PipelineReport::default();

    match handles.sources.join() {
        Ok(Ok(sources)) => report.sources = sources,
        Ok(Err(e)) => record_first_error(first_error, format!("{:#}", e)),
        Err(_) => record_first_error(first_error, "source thread panicked".to_string()),
    }
    match handles.retrieval.join() {
        Ok(stats) => report.retrieval = stats,
        // The retrieval stage's close guard has already closed the router while unwinding.
        Err(_) => record_first_error(first_error, "retrieval thread panicked".to_string()),
    }
    for h in handles.players {
        match h.join() {
            Ok(p) => report.players.push(p),
            Err(_) => record_first_error(first_error, "player thread panicked".to_string()),
        }
    }
    report.router = router.stats();
    debug!(
        "pipeline done: {} resolved, {} played, {} stream(s)",
        report.retrieval.resolved(),
        report.played(),
        report.router.streams_created
    );
    report
}
