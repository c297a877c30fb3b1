//! Runtime configuration for the vanity search session.

use std::fmt;

/// Base58 tag for Monero mainnet addresses (leading '4').
pub const MONERO_PREFIX: u64 = 18;
/// Base58 tag for Monero testnet addresses (leading '9' or 'A').
pub const MONERO_TESTNET_PREFIX: u64 = 53;
/// Base58 tag for Aeon addresses (leading "Wm").
pub const AEON_PREFIX: u64 = 0xB2;

pub const DEFAULT_MIN_START_POS: usize = 1;
pub const DEFAULT_MAX_START_POS: usize = 2;
pub const DEFAULT_SEARCH_LENGTH: usize = 6;

/// Address network selector.
///
/// Chooses the base58 tag prepended to the raw address bytes, the display
/// label, and the mnemonic wordlist used when a match is logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Network {
    #[default]
    Monero,
    MoneroTestnet,
    Aeon,
    /// A raw base58 tag supplied as a number.
    Custom(u64),
}

impl Network {
    /// Parses an operator-supplied network argument: a known label
    /// (case-insensitive) or a raw numeric tag.
    pub fn from_arg(arg: &str) -> Result<Self, ConfigError> {
        match arg.trim().to_uppercase().as_str() {
            "XMR" => Ok(Network::Monero),
            "XMR_TEST" => Ok(Network::MoneroTestnet),
            "AEON" => Ok(Network::Aeon),
            other => other
                .parse::<u64>()
                .map(Network::Custom)
                .map_err(|_| ConfigError::InvalidPrefix(arg.to_string())),
        }
    }

    /// The varint tag encoded into the address.
    pub fn prefix_tag(self) -> u64 {
        match self {
            Network::Monero => MONERO_PREFIX,
            Network::MoneroTestnet => MONERO_TESTNET_PREFIX,
            Network::Aeon => AEON_PREFIX,
            Network::Custom(tag) => tag,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Network::Monero => "XMR",
            Network::MoneroTestnet => "XMR_TEST",
            Network::Aeon => "AEON",
            Network::Custom(_) => "NA",
        }
    }

    /// Wordlist used when rendering a matched key as a mnemonic phrase.
    ///
    /// Aeon historically carried its own wordlist; every supported network
    /// currently maps onto the English list.
    pub fn mnemonic_language(self) -> bip39::Language {
        match self {
            Network::Aeon => bip39::Language::English,
            _ => bip39::Language::English,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (prefix {})", self.label(), self.prefix_tag())
    }
}

/// Search parameters owned by a session.
///
/// Mutable in any session state; a running search keeps the snapshot taken
/// at `start`, so changes only apply to the next search.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// First address offset tested for a word (inclusive).
    pub min_start_pos: usize,
    /// Last address offset tested for a word (inclusive).
    pub max_start_pos: usize,
    /// Length of the indexed dictionary prefix.
    pub search_word_length: usize,
    pub network: Network,
    /// Print a message to the operator on every match.
    pub notify: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            min_start_pos: DEFAULT_MIN_START_POS,
            max_start_pos: DEFAULT_MAX_START_POS,
            search_word_length: DEFAULT_SEARCH_LENGTH,
            network: Network::default(),
            notify: false,
        }
    }
}

impl SessionConfig {
    /// Sets the offset window and indexed prefix length from operator input.
    ///
    /// All three values must parse; nothing is mutated otherwise. A window
    /// with `min > max` is accepted and simply never matches.
    pub fn set_window(&mut self, min: &str, max: &str, len: &str) -> Result<(), ConfigError> {
        let parse = |raw: &str| {
            raw.trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidWindow(raw.to_string()))
        };
        let min = parse(min)?;
        let max = parse(max)?;
        let len = parse(len)?;

        self.min_start_pos = min;
        self.max_start_pos = max;
        self.search_word_length = len;
        Ok(())
    }

    pub fn set_prefix(&mut self, arg: &str) -> Result<(), ConfigError> {
        self.network = Network::from_arg(arg)?;
        Ok(())
    }

    /// Flips the on-match operator notification and returns the new value.
    pub fn toggle_notify(&mut self) -> bool {
        self.notify = !self.notify;
        self.notify
    }
}

/// Outcome of parsing the thread-count argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadCount {
    /// The operator's value was used as given.
    Requested(usize),
    /// The argument was absent or unparsable; the core count was used.
    Defaulted(usize),
}

impl ThreadCount {
    pub fn get(self) -> usize {
        match self {
            ThreadCount::Requested(n) | ThreadCount::Defaulted(n) => n,
        }
    }

    pub fn is_defaulted(self) -> bool {
        matches!(self, ThreadCount::Defaulted(_))
    }
}

/// Parses the thread-count argument.
///
/// The search shell historically accepted free-form text here: an absent or
/// unparsable value falls back to the machine's core count, while a negative
/// value is rejected outright. Zero is valid and spawns no workers.
pub fn parse_thread_count(arg: Option<&str>) -> Result<ThreadCount, ConfigError> {
    let Some(raw) = arg else {
        return Ok(ThreadCount::Defaulted(num_cpus::get()));
    };
    match raw.trim().parse::<i64>() {
        Ok(n) if n < 0 => Err(ConfigError::InvalidThreads(raw.to_string())),
        Ok(n) => Ok(ThreadCount::Requested(n as usize)),
        Err(_) => Ok(ThreadCount::Defaulted(num_cpus::get())),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("expected an integer window value, got {0:?}")]
    InvalidWindow(String),
    #[error("invalid prefix choice: {0:?}")]
    InvalidPrefix(String),
    #[error("positive number of threads required, got {0:?}")]
    InvalidThreads(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_labels() {
        let net = Network::from_arg("xmr_test").unwrap();
        assert_eq!(net, Network::MoneroTestnet);
        assert_eq!(net.prefix_tag(), 53);

        let custom = Network::from_arg("99").unwrap();
        assert_eq!(custom, Network::Custom(99));
        assert_eq!(custom.label(), "NA");
    }

    #[test]
    fn test_network_invalid() {
        assert!(Network::from_arg("DOGE").is_err());
    }

    #[test]
    fn test_set_window_all_or_nothing() {
        let mut config = SessionConfig::default();
        assert!(config.set_window("3", "oops", "8").is_err());
        // Nothing changed
        assert_eq!(config.min_start_pos, DEFAULT_MIN_START_POS);
        assert_eq!(config.search_word_length, DEFAULT_SEARCH_LENGTH);

        config.set_window("3", "5", "8").unwrap();
        assert_eq!(config.min_start_pos, 3);
        assert_eq!(config.max_start_pos, 5);
        assert_eq!(config.search_word_length, 8);
    }

    #[test]
    fn test_thread_count_fallback() {
        assert!(parse_thread_count(None).unwrap().is_defaulted());
        assert!(parse_thread_count(Some("lots")).unwrap().is_defaulted());
        assert_eq!(
            parse_thread_count(Some("6")).unwrap(),
            ThreadCount::Requested(6)
        );
        assert_eq!(
            parse_thread_count(Some("0")).unwrap(),
            ThreadCount::Requested(0)
        );
        assert!(parse_thread_count(Some("-2")).is_err());
    }

    #[test]
    fn test_toggle_notify() {
        let mut config = SessionConfig::default();
        assert!(config.toggle_notify());
        assert!(!config.toggle_notify());
    }
}
