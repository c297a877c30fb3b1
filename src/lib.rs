//! # xmr_vanity
//!
//! Multi-threaded Monero/CryptoNote vanity address generator.
//!
//! ## Architecture
//!
//! - `config`: Session configuration and network selection
//! - `crypto`: Incremental key derivation, address encoding, mnemonics
//! - `matcher`: Dictionary index and offset-window matching
//! - `store`: Result accumulation and the durable match log
//! - `worker`: Search workers and session lifecycle

pub mod config;
pub mod crypto;
pub mod matcher;
pub mod store;
pub mod worker;

pub use config::{Network, SessionConfig};
pub use crypto::{KeyStream, RandomSource};
pub use matcher::{SearchMode, WordIndex};
pub use store::{MatchEvent, ResultStore};
pub use worker::{SearchSession, SessionError, StartStatus, StopStatus};
