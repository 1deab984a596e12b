// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The shared tile cache and its worker pool.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, SendError, Sender};
use hashbrown::HashMap;
use treemap_cushion::PixelBuffer;

use crate::{TileError, TileKey, TileSource};

/// Sizing and threading for a [`TileCache`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileCacheConfig {
    /// Edge length of every tile bitmap, in pixels.
    pub tile_px: u32,
    /// Maximum number of finished tiles kept; least recently used go first.
    ///
    /// Pending tiles and the tile that just finished are never evicted, so the
    /// cache may briefly hold more entries than this.
    pub capacity: usize,
    /// Background render threads. `0` renders on the calling thread.
    pub workers: usize,
}

impl Default for TileCacheConfig {
    fn default() -> Self {
        Self {
            tile_px: 256,
            capacity: 256,
            workers: 2,
        }
    }
}

/// What the cache knows about a tile.
#[derive(Clone, Debug)]
pub enum TileStatus {
    /// The bitmap is available.
    Ready(Arc<PixelBuffer>),
    /// A render is queued or running.
    Pending,
    /// The last render failed or panicked; it is not retried until the cache
    /// is invalidated.
    Failed,
}

/// Notification sent when a background render completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileEvent {
    /// The tile is now [`TileStatus::Ready`].
    Ready(TileKey),
    /// The tile is now [`TileStatus::Failed`].
    Failed(TileKey),
}

#[derive(Debug)]
struct Entry {
    status: TileStatus,
    last_used: u64,
}

struct State {
    tiles: HashMap<TileKey, Entry>,
    source: Arc<dyn TileSource>,
    generation: u64,
    tick: u64,
    capacity: usize,
}

impl core::fmt::Debug for State {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("State")
            .field("tiles", &self.tiles.len())
            .field("generation", &self.generation)
            .field("tick", &self.tick)
            .finish_non_exhaustive()
    }
}

impl State {
    fn touch(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    /// Evict least recently used finished tiles until within capacity.
    ///
    /// `keep` is never evicted, so a tile that just finished survives even
    /// when it was requested before everything else in the cache.
    fn evict(&mut self, keep: TileKey) {
        while self.tiles.len() > self.capacity {
            let victim = self
                .tiles
                .iter()
                .filter(|(k, e)| **k != keep && !matches!(e.status, TileStatus::Pending))
                .min_by_key(|(_, e)| e.last_used)
                .map(|(k, _)| *k);
            let Some(victim) = victim else {
                break;
            };
            log::trace!("evicting tile {victim:?}");
            self.tiles.remove(&victim);
        }
    }

    /// Record a finished render, unless it belongs to an older generation.
    ///
    /// `bitmap` is `None` when the render failed.
    fn complete(
        &mut self,
        job: &Job,
        bitmap: Option<PixelBuffer>,
        events: &Sender<TileEvent>,
    ) -> Option<TileStatus> {
        if job.generation != self.generation {
            log::trace!("dropping stale tile {:?} from generation {}", job.key, job.generation);
            return None;
        }
        let entry = self.tiles.get_mut(&job.key)?;
        let (status, event) = match bitmap {
            Some(buffer) => (TileStatus::Ready(Arc::new(buffer)), TileEvent::Ready(job.key)),
            None => (TileStatus::Failed, TileEvent::Failed(job.key)),
        };
        entry.status = status.clone();
        // The receiver lives as long as the cache; sends only fail during teardown.
        let _ = events.send(event);
        self.evict(job.key);
        Some(status)
    }
}

struct Job {
    key: TileKey,
    generation: u64,
    tile_px: u32,
    source: Arc<dyn TileSource>,
}

impl Job {
    /// Run the source. Errors and panics are logged and reported as `None`.
    fn run(&self) -> Option<PixelBuffer> {
        let source = &self.source;
        match catch_unwind(AssertUnwindSafe(|| source.render_tile(self.key, self.tile_px))) {
            Ok(Ok(buffer)) => Some(buffer),
            Ok(Err(err)) => {
                log::warn!("tile {:?} failed to render: {err}", self.key);
                None
            }
            Err(_) => {
                log::warn!("tile {:?} render panicked", self.key);
                None
            }
        }
    }
}

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A bounded cache of rendered tiles, filled in the background.
///
/// [`TileCache::lookup`] never blocks on rendering when workers are
/// configured: a miss schedules a job and reports [`TileStatus::Pending`],
/// and a [`TileEvent`] announces the result. Replacing the source or calling
/// [`TileCache::invalidate`] drops every tile and discards results of renders
/// that were already in flight.
pub struct TileCache {
    config: TileCacheConfig,
    state: Arc<Mutex<State>>,
    jobs: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
    events_tx: Sender<TileEvent>,
    events_rx: Receiver<TileEvent>,
}

impl core::fmt::Debug for TileCache {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TileCache")
            .field("config", &self.config)
            .field("state", &*lock(&self.state))
            .finish_non_exhaustive()
    }
}

impl TileCache {
    /// Create a cache rendering from `source`, starting its workers.
    pub fn new(config: TileCacheConfig, source: Arc<dyn TileSource>) -> Result<Self, TileError> {
        if config.tile_px == 0 {
            return Err(TileError::ZeroTileSize);
        }
        let state = Arc::new(Mutex::new(State {
            tiles: HashMap::new(),
            source,
            generation: 0,
            tick: 0,
            capacity: config.capacity,
        }));
        let (events_tx, events_rx) = crossbeam_channel::unbounded();
        let mut cache = Self {
            config,
            state,
            jobs: None,
            workers: Vec::with_capacity(config.workers),
            events_tx,
            events_rx,
        };
        if config.workers > 0 {
            let (jobs_tx, jobs_rx) = crossbeam_channel::unbounded::<Job>();
            for i in 0..config.workers {
                let jobs = jobs_rx.clone();
                let state = Arc::clone(&cache.state);
                let events = cache.events_tx.clone();
                let handle = thread::Builder::new()
                    .name(format!("treemap-tile-{i}"))
                    .spawn(move || worker_loop(&jobs, &state, &events))
                    .map_err(TileError::Spawn)?;
                cache.workers.push(handle);
            }
            cache.jobs = Some(jobs_tx);
        }
        log::debug!(
            "tile cache: {} px tiles, capacity {}, {} workers",
            config.tile_px,
            config.capacity,
            config.workers
        );
        Ok(cache)
    }

    /// The configuration in use.
    pub fn config(&self) -> &TileCacheConfig {
        &self.config
    }

    /// Status of `key`, scheduling a render on a miss.
    ///
    /// With `workers = 0` the render happens before this returns, so the
    /// result is never [`TileStatus::Pending`].
    pub fn lookup(&self, key: TileKey) -> TileStatus {
        let job = {
            let mut state = lock(&self.state);
            let tick = state.touch();
            if let Some(entry) = state.tiles.get_mut(&key) {
                entry.last_used = tick;
                return entry.status.clone();
            }
            state.tiles.insert(
                key,
                Entry {
                    status: TileStatus::Pending,
                    last_used: tick,
                },
            );
            Job {
                key,
                generation: state.generation,
                tile_px: self.config.tile_px,
                source: Arc::clone(&state.source),
            }
        };
        log::trace!("tile {key:?} missed, scheduling");

        match &self.jobs {
            Some(jobs) => match jobs.send(job) {
                Ok(()) => TileStatus::Pending,
                Err(SendError(job)) => {
                    log::warn!("tile workers are gone; rendering {key:?} inline");
                    self.render_inline(&job)
                }
            },
            None => self.render_inline(&job),
        }
    }

    fn render_inline(&self, job: &Job) -> TileStatus {
        let bitmap = job.run();
        lock(&self.state)
            .complete(job, bitmap, &self.events_tx)
            .unwrap_or(TileStatus::Pending)
    }

    /// Status of `key` without scheduling anything or touching its recency.
    pub fn peek(&self, key: TileKey) -> Option<TileStatus> {
        lock(&self.state).tiles.get(&key).map(|e| e.status.clone())
    }

    /// Drop every tile and ignore renders already in flight.
    pub fn invalidate(&self) {
        let mut state = lock(&self.state);
        state.tiles.clear();
        state.generation += 1;
        log::debug!("tile cache invalidated, generation {}", state.generation);
    }

    /// Render future tiles from `source`. Implies [`TileCache::invalidate`].
    pub fn set_source(&self, source: Arc<dyn TileSource>) {
        let mut state = lock(&self.state);
        state.source = source;
        state.tiles.clear();
        state.generation += 1;
        log::debug!("tile source replaced, generation {}", state.generation);
    }

    /// Current generation; bumped by every invalidation.
    pub fn generation(&self) -> u64 {
        lock(&self.state).generation
    }

    /// Number of entries, including pending and failed ones.
    pub fn len(&self) -> usize {
        lock(&self.state).tiles.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Next completion event, if one is waiting.
    pub fn try_next_event(&self) -> Option<TileEvent> {
        self.events_rx.try_recv().ok()
    }

    /// All completion events waiting right now.
    pub fn drain_events(&self) -> Vec<TileEvent> {
        self.events_rx.try_iter().collect()
    }

    /// Block until the next completion event arrives.
    ///
    /// Without workers this does not block and behaves like
    /// [`TileCache::try_next_event`].
    pub fn wait_event(&self) -> Option<TileEvent> {
        if self.workers.is_empty() {
            return self.try_next_event();
        }
        self.events_rx.recv().ok()
    }
}

impl Drop for TileCache {
    fn drop(&mut self) {
        // Closing the job channel ends every worker loop.
        self.jobs = None;
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                log::warn!("tile worker exited with a panic");
            }
        }
    }
}

fn worker_loop(jobs: &Receiver<Job>, state: &Mutex<State>, events: &Sender<TileEvent>) {
    // Ends once the cache drops the sending side.
    for job in jobs {
        {
            // Skip work that was invalidated while queued.
            let current = lock(state).generation;
            if current != job.generation {
                log::trace!("skipping stale job for {:?}", job.key);
                continue;
            }
        }
        let bitmap = job.run();
        lock(state).complete(&job, bitmap, events);
    }
}
