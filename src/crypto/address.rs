//! CryptoNote base58 address encoding.
//!
//! An address is `varint(tag) || spend_public || view_public || checksum`,
//! where the checksum is the first four bytes of the Keccak-256 digest of
//! everything before it. The blob is encoded in 8-byte blocks of 11 base58
//! characters; a shorter final block encodes to a fixed shorter width so the
//! address length is a function of the payload length alone.

use std::fmt;

use tiny_keccak::{Hasher, Keccak};

const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

const FULL_BLOCK_SIZE: usize = 8;
const FULL_ENCODED_BLOCK_SIZE: usize = 11;
/// Encoded width for each raw block length 0..=8.
const ENCODED_BLOCK_SIZES: [usize; 9] = [0, 2, 3, 5, 6, 7, 9, 10, 11];
const CHECKSUM_SIZE: usize = 4;
const PUBLIC_KEY_SIZE: usize = 32;

/// The raw contents of a decoded address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAddress {
    pub tag: u64,
    pub spend_public: [u8; 32],
    pub view_public: [u8; 32],
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Base58Error {
    #[error("invalid base58 character {0:?}")]
    InvalidCharacter(char),
    #[error("invalid encoded block length {0}")]
    InvalidBlockLength(usize),
    #[error("encoded block value overflows its width")]
    Overflow,
    #[error("address payload is truncated")]
    TruncatedPayload,
    #[error("address checksum mismatch")]
    ChecksumMismatch,
}

/// Encodes the public keypair as a base58 address under the given tag.
pub fn encode_address(tag: u64, spend_public: &[u8; 32], view_public: &[u8; 32]) -> String {
    let mut payload = Vec::with_capacity(10 + 2 * PUBLIC_KEY_SIZE + CHECKSUM_SIZE);
    write_varint(tag, &mut payload);
    payload.extend_from_slice(spend_public);
    payload.extend_from_slice(view_public);
    let sum = checksum(&payload);
    payload.extend_from_slice(&sum);
    encode(&payload)
}

/// Decodes an address back to its tag and public keys, verifying the
/// checksum. Inverse of [`encode_address`].
pub fn decode_address(address: &str) -> Result<DecodedAddress, Base58Error> {
    let raw = decode(address)?;
    if raw.len() < CHECKSUM_SIZE {
        return Err(Base58Error::TruncatedPayload);
    }
    let (payload, sum) = raw.split_at(raw.len() - CHECKSUM_SIZE);
    if checksum(payload) != sum {
        return Err(Base58Error::ChecksumMismatch);
    }

    let (tag, tag_len) = read_varint(payload)?;
    let keys = &payload[tag_len..];
    if keys.len() != 2 * PUBLIC_KEY_SIZE {
        return Err(Base58Error::TruncatedPayload);
    }

    let mut spend_public = [0u8; PUBLIC_KEY_SIZE];
    let mut view_public = [0u8; PUBLIC_KEY_SIZE];
    spend_public.copy_from_slice(&keys[..PUBLIC_KEY_SIZE]);
    view_public.copy_from_slice(&keys[PUBLIC_KEY_SIZE..]);

    Ok(DecodedAddress {
        tag,
        spend_public,
        view_public,
    })
}

fn encode(data: &[u8]) -> String {
    let mut out = String::with_capacity(
        (data.len() / FULL_BLOCK_SIZE) * FULL_ENCODED_BLOCK_SIZE + FULL_ENCODED_BLOCK_SIZE,
    );
    for chunk in data.chunks(FULL_BLOCK_SIZE) {
        encode_block(chunk, &mut out);
    }
    out
}

fn encode_block(data: &[u8], out: &mut String) {
    let mut num = 0u64;
    for &byte in data {
        num = num << 8 | u64::from(byte);
    }

    let width = ENCODED_BLOCK_SIZES[data.len()];
    let mut buf = [ALPHABET[0]; FULL_ENCODED_BLOCK_SIZE];
    for slot in buf[..width].iter_mut().rev() {
        *slot = ALPHABET[(num % 58) as usize];
        num /= 58;
    }
    for &c in &buf[..width] {
        out.push(c as char);
    }
}

fn decode(encoded: &str) -> Result<Vec<u8>, Base58Error> {
    let bytes = encoded.as_bytes();
    let mut out = Vec::with_capacity(bytes.len() * FULL_BLOCK_SIZE / FULL_ENCODED_BLOCK_SIZE + 1);
    for chunk in bytes.chunks(FULL_ENCODED_BLOCK_SIZE) {
        decode_block(chunk, &mut out)?;
    }
    Ok(out)
}

fn decode_block(block: &[u8], out: &mut Vec<u8>) -> Result<(), Base58Error> {
    let width = ENCODED_BLOCK_SIZES
        .iter()
        .position(|&size| size == block.len())
        .ok_or(Base58Error::InvalidBlockLength(block.len()))?;

    let mut num: u64 = 0;
    for &c in block {
        let digit = ALPHABET
            .iter()
            .position(|&a| a == c)
            .ok_or(Base58Error::InvalidCharacter(c as char))? as u64;
        num = num
            .checked_mul(58)
            .and_then(|n| n.checked_add(digit))
            .ok_or(Base58Error::Overflow)?;
    }
    if width < FULL_BLOCK_SIZE && num >= 1u64 << (8 * width) {
        return Err(Base58Error::Overflow);
    }

    out.extend_from_slice(&num.to_be_bytes()[FULL_BLOCK_SIZE - width..]);
    Ok(())
}

fn checksum(data: &[u8]) -> [u8; CHECKSUM_SIZE] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut digest = [0u8; 32];
    hasher.finalize(&mut digest);
    let mut sum = [0u8; CHECKSUM_SIZE];
    sum.copy_from_slice(&digest[..CHECKSUM_SIZE]);
    sum
}

fn write_varint(mut value: u64, out: &mut Vec<u8>) {
    while value >= 0x80 {
        out.push((value & 0x7f) as u8 | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

fn read_varint(data: &[u8]) -> Result<(u64, usize), Base58Error> {
    let mut value = 0u64;
    for (i, &byte) in data.iter().enumerate().take(10) {
        value |= u64::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(Base58Error::TruncatedPayload)
}

impl fmt::Display for DecodedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tag {} spend {} view {}",
            self.tag,
            hex::encode(self.spend_public),
            hex::encode(self.view_public)
        )
    }
}
