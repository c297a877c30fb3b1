//! Search session lifecycle.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::config::{parse_thread_count, ConfigError, SessionConfig};
use crate::crypto::{KeyStream, RandomSource};
use crate::matcher::{SearchMode, WordIndex};
use crate::store::{MatchEvent, ResultStore, StoreError};

use super::search::{SearchWorker, WorkerStats};

const EVENT_CHANNEL_CAPACITY: usize = 100;

/// Outcome of [`SearchSession::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartStatus {
    /// Workers are running.
    Started {
        threads: usize,
        /// The thread argument was absent or unparsable and the default
        /// count was used.
        threads_defaulted: bool,
    },
    /// A search was already running; nothing changed.
    AlreadyActive,
}

/// Outcome of [`SearchSession::stop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopStatus {
    /// Every worker observed the cleared flag and exited; the log is closed.
    Stopped,
    /// No search was running; nothing changed.
    NotActive,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Output(#[from] StoreError),
}

/// Owns the configuration, the result store, and the worker pool, cycling
/// between idle and active.
///
/// `start` and `stop` are driven from a single control thread; workers only
/// share the store, the random source, and the active flag.
pub struct SearchSession {
    config: SessionConfig,
    store: Arc<ResultStore>,
    rng: Arc<RandomSource>,
    active: Arc<AtomicBool>,
    stats: Arc<WorkerStats>,
    handles: Vec<JoinHandle<()>>,
    events_tx: Sender<MatchEvent>,
    events_rx: Receiver<MatchEvent>,
    started_at: Instant,
}

impl SearchSession {
    pub fn new(config: SessionConfig) -> Self {
        let (events_tx, events_rx) = bounded(EVENT_CHANNEL_CAPACITY);
        Self {
            config,
            store: Arc::new(ResultStore::new()),
            rng: Arc::new(RandomSource::new()),
            active: Arc::new(AtomicBool::new(false)),
            stats: Arc::new(WorkerStats::new()),
            handles: Vec::new(),
            events_tx,
            events_rx,
            started_at: Instant::now(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }

    /// Starts a search and returns immediately; workers run detached from
    /// the caller until [`stop`](Self::stop).
    ///
    /// `source` is tried as a dictionary file first; if it cannot be read,
    /// the search falls back to treating `source` itself as the literal
    /// word. A bad thread argument or unwritable output path aborts with the
    /// session still idle. Calling `start` on an active session changes
    /// nothing.
    pub fn start(
        &mut self,
        source: &str,
        output: impl AsRef<Path>,
        threads: Option<&str>,
    ) -> Result<StartStatus, SessionError> {
        if self.is_active() {
            return Ok(StartStatus::AlreadyActive);
        }

        let threads = parse_thread_count(threads)?;

        let mode = match WordIndex::build(source, self.config.search_word_length) {
            Ok(index) => SearchMode::Dictionary(Arc::new(index)),
            // A missing word file and a malformed one are treated alike:
            // the argument becomes the literal search word.
            Err(_) => SearchMode::literal(source),
        };

        self.store.open(
            output,
            self.config.network,
            self.config.notify,
            self.events_tx.clone(),
        )?;

        let count = threads.get();
        self.stats = Arc::new(WorkerStats::new());
        self.started_at = Instant::now();
        self.active.store(true, Ordering::Relaxed);

        self.handles = (0..count)
            .map(|id| {
                let worker = SearchWorker::new(
                    id,
                    KeyStream::generate(&self.rng),
                    mode.clone(),
                    self.config.min_start_pos,
                    self.config.max_start_pos,
                    self.config.network,
                    self.store.clone(),
                    self.rng.clone(),
                    self.active.clone(),
                    self.stats.clone(),
                );
                thread::Builder::new()
                    .name(format!("vanity-worker-{}", id))
                    .spawn(move || worker.run())
                    .expect("Failed to spawn worker thread")
            })
            .collect();

        Ok(StartStatus::Started {
            threads: count,
            threads_defaulted: threads.is_defaulted(),
        })
    }

    /// Stops the search: clears the flag, waits for every worker to finish
    /// its current iteration and exit, then closes the log.
    pub fn stop(&mut self) -> StopStatus {
        if !self.is_active() {
            return StopStatus::NotActive;
        }

        self.active.store(false, Ordering::Relaxed);
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
        self.store.close();
        StopStatus::Stopped
    }

    /// Blocks up to `timeout` for the next match notification.
    ///
    /// Events flow only while the session's notify flag was set at start.
    pub fn wait_for_match(&self, timeout: Duration) -> Option<MatchEvent> {
        self.events_rx.recv_timeout(timeout).ok()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// See [`SessionConfig::set_window`]; takes effect on the next start.
    pub fn set_window(&mut self, min: &str, max: &str, len: &str) -> Result<(), ConfigError> {
        self.config.set_window(min, max, len)
    }

    /// See [`SessionConfig::set_prefix`]; takes effect on the next start.
    pub fn set_prefix(&mut self, arg: &str) -> Result<(), ConfigError> {
        self.config.set_prefix(arg)
    }

    /// See [`SessionConfig::toggle_notify`]; takes effect on the next start.
    pub fn toggle_notify(&mut self) -> bool {
        self.config.toggle_notify()
    }

    /// Found words passing the filters, across every search this session ran.
    pub fn found_words(
        &self,
        first_letter: Option<char>,
        min_length: Option<usize>,
    ) -> Vec<String> {
        self.store.words(first_letter, min_length)
    }

    /// Addresses recorded for a word, in discovery order.
    pub fn addresses_for(&self, word: &str) -> Vec<String> {
        self.store.addresses_for(word)
    }

    pub fn num_workers(&self) -> usize {
        self.handles.len()
    }

    /// Candidate keys checked by the current (or last) search.
    pub fn total_keys(&self) -> u64 {
        self.stats.total_keys()
    }

    pub fn total_matches(&self) -> u64 {
        self.stats.total_matches()
    }

    /// Time since the current (or last) search started.
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn keys_per_second(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.total_keys() as f64 / elapsed
        } else {
            0.0
        }
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        self.stop();
    }
}
