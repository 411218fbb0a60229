//! Playback router: maps a routing key to a bounded stream, creating streams on first use.
//!
//! The key → stream map is the only shared mutable structure in the pipeline. The lock is held
//! for lookup-or-create and close only; callers get a cloned sender and send outside the lock.

use anyhow::Result;
use crossbeam_channel::{Receiver, Sender, bounded};
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{Mode, ResolvedItem, RoutingKey};

/// How items are assigned to streams.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoutingPolicy {
    /// One stream for the whole run, whatever the term.
    SingleKey,
    /// One stream per search term.
    PerTerm,
}

impl RoutingPolicy {
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Mix => RoutingPolicy::PerTerm,
            _ => RoutingPolicy::SingleKey,
        }
    }

    pub fn key_for(self, term: &str) -> RoutingKey {
        match self {
            RoutingPolicy::SingleKey => RoutingKey::Shared,
            RoutingPolicy::PerTerm => RoutingKey::Term(term.to_string()),
        }
    }
}

/// Instrumentation counters. After a completed run `streams_closed == streams_created`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouterStats {
    pub streams_created: usize,
    pub streams_closed: usize,
    /// Keys in creation order.
    pub keys: Vec<RoutingKey>,
}

struct StreamSlot {
    /// None once closed.
    tx: Option<Sender<ResolvedItem>>,
    /// Taken by the stream's one player.
    rx: Option<Receiver<ResolvedItem>>,
}

#[derive(Default)]
struct RouterState {
    slots: HashMap<RoutingKey, StreamSlot>,
    stats: RouterStats,
    closed: bool,
}

pub struct Router {
    policy: RoutingPolicy,
    capacity: usize,
    state: Mutex<RouterState>,
}

impl Router {
    /// Single-key routers create their one stream right away.
    pub fn new(policy: RoutingPolicy, capacity: usize) -> Self {
        let router = Self {
            policy,
            capacity,
            state: Mutex::new(RouterState::default()),
        };
        if policy == RoutingPolicy::SingleKey {
            let mut state = router.lock();
            Self::slot_for(&mut state, RoutingKey::Shared, capacity);
        }
        router
    }

    pub fn policy(&self) -> RoutingPolicy {
        self.policy
    }

    fn lock(&self) -> MutexGuard<'_, RouterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn slot_for(state: &mut RouterState, key: RoutingKey, capacity: usize) -> &mut StreamSlot {
        let RouterState { slots, stats, .. } = state;
        slots.entry(key).or_insert_with_key(|key| {
            debug!("Creating stream {}", key);
            stats.streams_created += 1;
            stats.keys.push(key.clone());
            let (tx, rx) = bounded::<ResolvedItem>(capacity);
            StreamSlot {
                tx: Some(tx),
                rx: Some(rx),
            }
        })
    }

    /// Sending end of the stream for `term`, creating the stream if absent.
    /// Routing after [`close`](Self::close) is a programming error and is reported as such.
    pub fn route(&self, term: &str) -> Result<Sender<ResolvedItem>> {
        let key = self.policy.key_for(term);
        let mut state = self.lock();
        if state.closed {
            anyhow::bail!("route to {} after router close", key);
        }
        let slot = Self::slot_for(&mut state, key.clone(), self.capacity);
        slot.tx
            .clone()
            .ok_or_else(|| anyhow::anyhow!("stream {} already closed", key))
    }

    /// Receiving end of the stream for `term`, creating the stream if absent.
    /// Each stream has exactly one player, so this succeeds once per stream.
    pub fn subscribe(&self, term: &str) -> Result<Receiver<ResolvedItem>> {
        let key = self.policy.key_for(term);
        let mut state = self.lock();
        if state.closed {
            anyhow::bail!("subscribe to {} after router close", key);
        }
        let slot = Self::slot_for(&mut state, key.clone(), self.capacity);
        slot.rx
            .take()
            .ok_or_else(|| anyhow::anyhow!("stream {} already has a player", key))
    }

    /// Close every stream ever created. Players drain what is queued and exit.
    /// Returns the number of streams closed by this call; a second call closes nothing.
    pub fn close(&self) -> usize {
        let mut state = self.lock();
        if state.closed {
            warn!("Router already closed");
            return 0;
        }
        state.closed = true;
        let mut closed = 0;
        for slot in state.slots.values_mut() {
            if slot.tx.take().is_some() {
                closed += 1;
            }
        }
        state.stats.streams_closed += closed;
        debug!("Closed {} stream(s)", closed);
        closed
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub fn stats(&self) -> RouterStats {
        self.lock().stats.clone()
    }

    /// Guard that closes the router when dropped, even if the owner returns early.
    pub fn close_on_drop(&self) -> CloseOnDrop<'_> {
        CloseOnDrop(self)
    }
}

pub struct CloseOnDrop<'a>(&'a Router);

impl Drop for CloseOnDrop<'_> {
    fn drop(&mut self) {
        self.0.close();
    }
}
