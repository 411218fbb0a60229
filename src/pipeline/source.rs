//! Catalog query sources: one per search term, feeding the shared intake.

use anyhow::Result;
use crossbeam_channel::Sender;
use log::{debug, error};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::CatalogItem;
use crate::engine::catalog::Catalog;

use super::context::FirstError;
use super::error_handler::{has_failed, record_first_error};

/// Items one term's source handed to the intake.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceReport {
    pub term: String,
    pub produced: usize,
}

/// Run one term's query into `intake`. A catalog error is fatal for the whole pipeline:
/// it is recorded in `first_error` and the source stops.
pub fn run_source(
    catalog: &dyn Catalog,
    term: &str,
    limit: usize,
    intake: &Sender<CatalogItem>,
    first_error: &FirstError,
) -> SourceReport {
    let produced = match catalog.search(term, limit, intake) {
        Ok(n) => n,
        Err(e) => {
            error!("Query {:?}: {:#}", term, e);
            record_first_error(first_error, format!("query {:?}: {:#}", term, e));
            0
        }
    };
    debug!("source {:?}: {} item(s)", term, produced);
    SourceReport {
        term: term.to_string(),
        produced,
    }
}

/// Spawn the sources for `terms`. Sequential runs one term after the other on a single thread;
/// concurrent runs one thread per term and joins them all before finishing. Either way the
/// intake sender is dropped only after the last source is done.
pub fn spawn_sources(
    terms: Vec<String>,
    concurrent: bool,
    catalog: Arc<dyn Catalog>,
    limit: usize,
    intake: Sender<CatalogItem>,
    first_error: FirstError,
) -> JoinHandle<Result<Vec<SourceReport>>> {
    thread::spawn(move || {
        let reports = if concurrent {
            run_concurrent(terms, catalog, limit, &intake, &first_error)
        } else {
            Ok(run_sequential(
                &terms,
                catalog.as_ref(),
                limit,
                &intake,
                &first_error,
            ))
        };
        drop(intake);
        reports
    })
}

fn run_sequential(
    terms: &[String],
    catalog: &dyn Catalog,
    limit: usize,
    intake: &Sender<CatalogItem>,
    first_error: &FirstError,
) -> Vec<SourceReport> {
    let mut reports = Vec::with_capacity(terms.len());
    for term in terms {
        if has_failed(first_error) {
            break;
        }
        reports.push(run_source(catalog, term, limit, intake, first_error));
    }
    reports
}

/// One thread per term; the join loop is the completion barrier for all of them.
fn run_concurrent(
    terms: Vec<String>,
    catalog: Arc<dyn Catalog>,
    limit: usize,
    intake: &Sender<CatalogItem>,
    first_error: &FirstError,
) -> Result<Vec<SourceReport>> {
    let handles: Vec<JoinHandle<SourceReport>> = terms
        .into_iter()
        .map(|term| {
            let catalog = Arc::clone(&catalog);
            let intake = intake.clone();
            let first_error = Arc::clone(first_error);
            thread::spawn(move || {
                run_source(catalog.as_ref(), &term, limit, &intake, &first_error)
            })
        })
        .collect();

    let mut reports = Vec::with_capacity(handles.len());
    let mut panicked = false;
    for h in handles {
        match h.join() {
            Ok(r) => reports.push(r),
            Err(_) => panicked = true,
        }
    }
    if panicked {
        anyhow::bail!("source thread panicked");
    }
    Ok(reports)
}
