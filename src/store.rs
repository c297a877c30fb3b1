//! Thread-safe accumulation and durable logging of matches.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, LineWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crossbeam_channel::Sender;

use crate::config::Network;
use crate::crypto::{secret_to_mnemonic, MnemonicError, SecretExport};

const SEPARATOR: &str = "------------------------------------";

/// Notification emitted on every recorded match while notification is armed.
#[derive(Debug, Clone)]
pub struct MatchEvent {
    pub word: String,
    pub address: String,
    pub worker_id: usize,
}

/// Shared accumulator of matched words and addresses.
///
/// One mutex serializes the found-word map, the durable match log, and
/// operator output; workers may match concurrently. The map outlives
/// individual searches so results stay queryable after a stop.
pub struct ResultStore {
    inner: Mutex<Inner>,
}

struct Inner {
    found: HashMap<String, Vec<String>>,
    log: Option<LineWriter<File>>,
    network: Network,
    notify: bool,
    events: Option<Sender<MatchEvent>>,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not open {path:?} for writing: {source}")]
    OutputUnwritable { path: PathBuf, source: io::Error },
    #[error("could not append to the match log: {0}")]
    LogWrite(#[from] io::Error),
    #[error(transparent)]
    Mnemonic(#[from] MnemonicError),
}

impl ResultStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                found: HashMap::new(),
                log: None,
                network: Network::default(),
                notify: false,
                events: None,
            }),
        }
    }

    /// Opens (truncating) the durable log and arms match notification for a
    /// new search. Words found by earlier searches are retained.
    pub fn open(
        &self,
        path: impl AsRef<Path>,
        network: Network,
        notify: bool,
        events: Sender<MatchEvent>,
    ) -> Result<(), StoreError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| StoreError::OutputUnwritable {
            path: path.to_path_buf(),
            source,
        })?;

        let mut inner = self.inner.lock().unwrap();
        inner.log = Some(LineWriter::new(file));
        inner.network = network;
        inner.notify = notify;
        inner.events = Some(events);
        Ok(())
    }

    /// Flushes and closes the log; the found-word map is retained.
    pub fn close(&self) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(mut log) = inner.log.take() {
            let _ = log.flush();
        }
        inner.events = None;
    }

    /// Records one match: appends the address under the word, writes the
    /// match block to the log, then notifies the operator channel if armed.
    pub fn record(
        &self,
        word: &str,
        address: &str,
        export: &SecretExport,
        worker_id: usize,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .found
            .entry(word.to_string())
            .or_default()
            .push(address.to_string());

        let phrase = secret_to_mnemonic(&export.raw_spend, inner.network)?;
        if let Some(log) = inner.log.as_mut() {
            writeln!(log, "{SEPARATOR}")?;
            writeln!(log, "WORD:     {word}")?;
            writeln!(log, "ADDRESS:  {address}")?;
            writeln!(log, "SPENDKEY: {}", export.spend_key_hex)?;
            writeln!(log, "VIEWKEY:  {}", export.view_key_hex)?;
            writeln!(log, "{phrase}")?;
            writeln!(log, "{SEPARATOR}")?;
            log.flush()?;
        }

        if inner.notify {
            if let Some(events) = &inner.events {
                // Lossy: the map and log above are the durable record.
                let _ = events.try_send(MatchEvent {
                    word: word.to_string(),
                    address: address.to_string(),
                    worker_id,
                });
            }
        }
        Ok(())
    }

    /// Found words passing both filters, deduplicated and sorted.
    pub fn words(&self, first_letter: Option<char>, min_length: Option<usize>) -> Vec<String> {
        let inner = self.inner.lock().unwrap();
        let mut words: Vec<String> = inner
            .found
            .keys()
            .filter(|word| {
                first_letter.map_or(true, |letter| {
                    word.chars().next() == Some(letter.to_ascii_uppercase())
                })
            })
            .filter(|word| min_length.map_or(true, |len| word.chars().count() >= len))
            .cloned()
            .collect();
        words.sort();
        words
    }

    /// Addresses recorded for a word, in discovery order.
    pub fn addresses_for(&self, word: &str) -> Vec<String> {
        let inner = self.inner.lock().unwrap();
        inner
            .found
            .get(&word.to_uppercase())
            .cloned()
            .unwrap_or_default()
    }

    /// Total number of recorded matches.
    pub fn total_recorded(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.found.values().map(Vec::len).sum()
    }

    /// Prints a line through the same serialization point as the log, so
    /// worker reports never interleave with each other.
    pub fn emit_report(&self, text: &str) {
        let _inner = self.inner.lock().unwrap();
        println!("{text}");
    }
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;
    use curve25519_dalek::scalar::Scalar;

    use crate::crypto::KeyStream;

    fn export() -> SecretExport {
        KeyStream::from_spend_secret(Scalar::from(7u64)).export()
    }

    fn open_store(notify: bool) -> (ResultStore, crossbeam_channel::Receiver<MatchEvent>, tempfile::TempPath) {
        let path = tempfile::NamedTempFile::new().unwrap().into_temp_path();
        let (tx, rx) = bounded(16);
        let store = ResultStore::new();
        store
            .open(&path, Network::Monero, notify, tx)
            .unwrap();
        (store, rx, path)
    }

    #[test]
    fn test_record_accumulates_in_discovery_order() {
        let (store, _rx, _path) = open_store(false);
        store.record("MONERO", "4aaa", &export(), 0).unwrap();
        store.record("MONERO", "4bbb", &export(), 1).unwrap();
        assert_eq!(store.addresses_for("monero"), ["4aaa", "4bbb"]);
        assert_eq!(store.total_recorded(), 2);
    }

    #[test]
    fn test_words_filters() {
        let (store, _rx, _path) = open_store(false);
        store.record("MONERO", "4aaa", &export(), 0).unwrap();
        store.record("MONKS", "4bbb", &export(), 0).unwrap();
        store.record("CAFE", "4ccc", &export(), 0).unwrap();

        assert_eq!(store.words(None, None), ["CAFE", "MONERO", "MONKS"]);
        assert_eq!(store.words(Some('m'), None), ["MONERO", "MONKS"]);
        assert_eq!(store.words(None, Some(5)), ["MONERO", "MONKS"]);
        assert_eq!(store.words(Some('M'), Some(6)), ["MONERO"]);
    }

    #[test]
    fn test_log_block_format() {
        let (store, _rx, path) = open_store(false);
        let export = export();
        store.record("MONERO", "4addr", &export, 0).unwrap();
        store.close();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], SEPARATOR);
        assert_eq!(lines[1], "WORD:     MONERO");
        assert_eq!(lines[2], "ADDRESS:  4addr");
        assert_eq!(lines[3], format!("SPENDKEY: {}", export.spend_key_hex));
        assert_eq!(lines[4], format!("VIEWKEY:  {}", export.view_key_hex));
        assert_eq!(lines[5].split_whitespace().count(), 24);
        assert_eq!(lines[6], SEPARATOR);
    }

    #[test]
    fn test_notify_channel() {
        let (store, rx, _path) = open_store(true);
        store.record("CAFE", "4ddd", &export(), 3).unwrap();
        let event = rx.try_recv().unwrap();
        assert_eq!(event.word, "CAFE");
        assert_eq!(event.address, "4ddd");
        assert_eq!(event.worker_id, 3);
    }

    #[test]
    fn test_no_events_when_notify_off() {
        let (store, rx, _path) = open_store(false);
        store.record("CAFE", "4ddd", &export(), 0).unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_results_survive_close() {
        let (store, _rx, _path) = open_store(false);
        store.record("CAFE", "4eee", &export(), 0).unwrap();
        store.close();
        assert_eq!(store.addresses_for("CAFE"), ["4eee"]);
    }
}
