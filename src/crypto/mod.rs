//! Cryptographic operations for CryptoNote key and address generation.
//!
//! This module provides:
//! - Incremental ed25519 keypair derivation over curve25519-dalek
//! - CryptoNote base58 address encoding using Keccak-256 checksums
//! - Mnemonic phrase rendering for matched secrets

mod address;
mod keys;
mod mnemonic;

pub use address::{decode_address, encode_address, Base58Error, DecodedAddress};
pub use keys::{KeyStream, RandomSource, SecretExport};
pub use mnemonic::{secret_to_mnemonic, MnemonicError};
