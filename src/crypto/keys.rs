//! Incremental ed25519 keypair derivation.

use std::sync::Mutex;

use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::Scalar;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tiny_keccak::{Hasher, Keccak};

use crate::config::Network;

use super::address;

/// Shared source of fresh key material.
///
/// The underlying generator keeps internal mutable state and is not safe for
/// concurrent callers, so every reseed goes through this one mutex-guarded
/// handle. Incrementing a [`KeyStream`] never touches it.
pub struct RandomSource {
    inner: Mutex<StdRng>,
}

impl RandomSource {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Draws a uniformly random scalar, reduced into the group order.
    pub fn random_scalar(&self) -> Scalar {
        let mut wide = [0u8; 64];
        self.inner.lock().unwrap().fill_bytes(&mut wide);
        Scalar::from_bytes_mod_order_wide(&wide)
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::new()
    }
}

/// A worker's current position in the keypair space.
///
/// Holds the spend/view secrets and their public points. [`increment`] walks
/// the scalar space one key at a time; [`reseed`] jumps to a fresh random
/// position.
///
/// [`increment`]: KeyStream::increment
/// [`reseed`]: KeyStream::reseed
#[derive(Debug, Clone)]
pub struct KeyStream {
    spend_secret: Scalar,
    view_secret: Scalar,
    spend_public: CompressedEdwardsY,
    view_public: CompressedEdwardsY,
}

/// Secret material exported when a match is recorded.
#[derive(Debug, Clone)]
pub struct SecretExport {
    pub spend_key_hex: String,
    pub view_key_hex: String,
    pub raw_spend: [u8; 32],
}

impl KeyStream {
    /// Creates a stream at a random position in the keypair space.
    pub fn generate(rng: &RandomSource) -> Self {
        Self::from_spend_secret(rng.random_scalar())
    }

    /// Derives the full keypair set from a spend secret.
    ///
    /// The view secret is the reduced Keccak-256 digest of the spend secret,
    /// as CryptoNote deterministic wallets define it.
    pub fn from_spend_secret(spend_secret: Scalar) -> Self {
        let view_secret = derive_view_secret(&spend_secret);
        Self {
            spend_public: mul_base(&spend_secret),
            view_public: mul_base(&view_secret),
            spend_secret,
            view_secret,
        }
    }

    /// Advances to the next key: spend secret plus one, reduced, with the
    /// view secret and both public points re-derived.
    pub fn increment(&mut self) {
        *self = Self::from_spend_secret(self.spend_secret + Scalar::ONE);
    }

    /// Jumps to a fresh random position, decorrelating the scan trajectory.
    pub fn reseed(&mut self, rng: &RandomSource) {
        *self = Self::from_spend_secret(rng.random_scalar());
    }

    /// Base58 address string for the current public points.
    pub fn address(&self, network: Network) -> String {
        address::encode_address(
            network.prefix_tag(),
            self.spend_public.as_bytes(),
            self.view_public.as_bytes(),
        )
    }

    /// Exports the secrets for logging; read-only.
    pub fn export(&self) -> SecretExport {
        SecretExport {
            spend_key_hex: hex::encode(self.spend_secret.as_bytes()),
            view_key_hex: hex::encode(self.view_secret.as_bytes()),
            raw_spend: self.spend_secret.to_bytes(),
        }
    }

    pub fn spend_public(&self) -> &[u8; 32] {
        self.spend_public.as_bytes()
    }

    pub fn view_public(&self) -> &[u8; 32] {
        self.view_public.as_bytes()
    }
}

fn derive_view_secret(spend_secret: &Scalar) -> Scalar {
    let mut hasher = Keccak::v256();
    hasher.update(spend_secret.as_bytes());
    let mut digest = [0u8; 32];
    hasher.finalize(&mut digest);
    Scalar::from_bytes_mod_order(digest)
}

fn mul_base(secret: &Scalar) -> CompressedEdwardsY {
    EdwardsPoint::mul_base(secret).compress()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::address::decode_address;

    #[test]
    fn test_increment_composes() {
        let mut a = KeyStream::from_spend_secret(Scalar::from(41u64));
        a.increment();
        a.increment();

        let mut b = KeyStream::from_spend_secret(Scalar::from(42u64));
        b.increment();

        assert_eq!(a.spend_public(), b.spend_public());
        assert_eq!(a.view_public(), b.view_public());
        assert_eq!(a.export().spend_key_hex, b.export().spend_key_hex);
    }

    #[test]
    fn test_view_secret_derivation() {
        let keys = KeyStream::from_spend_secret(Scalar::from(7u64));

        let mut hasher = Keccak::v256();
        hasher.update(keys.export().raw_spend.as_slice());
        let mut digest = [0u8; 32];
        hasher.finalize(&mut digest);
        let expected = Scalar::from_bytes_mod_order(digest);

        assert_eq!(keys.export().view_key_hex, hex::encode(expected.as_bytes()));
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let a = KeyStream::from_spend_secret(Scalar::from(99u64));
        let b = KeyStream::from_spend_secret(Scalar::from(99u64));
        assert_eq!(a.spend_public(), b.spend_public());
        assert_eq!(a.view_public(), b.view_public());
    }

    #[test]
    fn test_reseed_produces_canonical_scalar() {
        let rng = RandomSource::new();
        let mut keys = KeyStream::generate(&rng);
        keys.reseed(&rng);
        let raw = keys.export().raw_spend;
        let canonical: Option<Scalar> = Scalar::from_canonical_bytes(raw).into();
        assert!(canonical.is_some());
    }

    #[test]
    fn test_address_round_trip() {
        let keys = KeyStream::from_spend_secret(Scalar::from(12345u64));
        let addr = keys.address(Network::Monero);
        let decoded = decode_address(&addr).unwrap();
        assert_eq!(decoded.tag, Network::Monero.prefix_tag());
        assert_eq!(&decoded.spend_public, keys.spend_public());
        assert_eq!(&decoded.view_public, keys.view_public());
    }
}
