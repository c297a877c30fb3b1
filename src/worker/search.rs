//! The brute-force scan loop.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::config::Network;
use crate::crypto::{KeyStream, RandomSource};
use crate::matcher::SearchMode;
use crate::store::ResultStore;

/// Counters shared by every worker in a search.
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Candidate keys derived and scanned
    pub keys_checked: AtomicU64,
    /// Matches recorded
    pub matches_found: AtomicU64,
}

impl WorkerStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_keys(&self) -> u64 {
        self.keys_checked.load(Ordering::Relaxed)
    }

    pub fn total_matches(&self) -> u64 {
        self.matches_found.load(Ordering::Relaxed)
    }
}

/// One search loop bound to its own key stream.
pub struct SearchWorker {
    id: usize,
    keys: KeyStream,
    mode: SearchMode,
    min_start_pos: usize,
    max_start_pos: usize,
    network: Network,
    store: Arc<ResultStore>,
    rng: Arc<RandomSource>,
    active: Arc<AtomicBool>,
    stats: Arc<WorkerStats>,
}

impl SearchWorker {
    pub fn new(
        id: usize,
        keys: KeyStream,
        mode: SearchMode,
        min_start_pos: usize,
        max_start_pos: usize,
        network: Network,
        store: Arc<ResultStore>,
        rng: Arc<RandomSource>,
        active: Arc<AtomicBool>,
        stats: Arc<WorkerStats>,
    ) -> Self {
        Self {
            id,
            keys,
            mode,
            min_start_pos,
            max_start_pos,
            network,
            store,
            rng,
            active,
            stats,
        }
    }

    /// Runs the scan loop until the session clears the active flag.
    ///
    /// One iteration is one candidate key: advance the stream, derive the
    /// address, scan the offset window, record any matches, and reseed after
    /// a match so the next keys are uncorrelated with the found one. The
    /// flag is checked once per full iteration.
    pub fn run(mut self) {
        let start_time = Instant::now();
        let mut iterations: u64 = 0;
        let mut record_failed = false;

        while self.active.load(Ordering::Relaxed) {
            self.keys.increment();
            let address = self.keys.address(self.network);
            let upper_address = address.to_uppercase();

            let matches = self
                .mode
                .scan(&upper_address, self.min_start_pos, self.max_start_pos);
            if !matches.is_empty() {
                let export = self.keys.export();
                for word in &matches {
                    self.stats.matches_found.fetch_add(1, Ordering::Relaxed);
                    if let Err(e) = self.store.record(word, &address, &export, self.id) {
                        if !record_failed {
                            record_failed = true;
                            self.store.emit_report(&format!(
                                "Thread [{}]: failed to record match: {}",
                                self.id, e
                            ));
                        }
                    }
                }
                self.keys.reseed(&self.rng);
            }

            iterations += 1;
            self.stats.keys_checked.fetch_add(1, Ordering::Relaxed);
        }

        let elapsed = start_time.elapsed().as_secs_f64();
        let rate = if elapsed > 0.0 {
            iterations as f64 / elapsed
        } else {
            0.0
        };
        self.store.emit_report(&format!(
            "Thread [{}]:\n{} Addresses Checked\n{:.3} Seconds\n{:.0} Addresses / Sec on Average",
            self.id, iterations, elapsed, rate
        ));
    }

    pub fn id(&self) -> usize {
        self.id
    }
}
